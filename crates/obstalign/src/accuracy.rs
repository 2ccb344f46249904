use obstalign_linalg::{stats::SummaryStats, LinalgError};

use crate::TransformResult;

/// Residual statistics of a fit and how much of each set was matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    /// Count, mean, median, max, min and standard deviation of the residuals.
    pub residuals: SummaryStats,
    /// Source obstacles left without a partner.
    pub unmatched_src: usize,
    /// Destination obstacles left without a partner.
    pub unmatched_dst: usize,
}

impl AccuracyReport {
    /// Summarize a fit over sets of `num_src` and `num_dst` obstacles.
    pub fn new(
        result: &TransformResult,
        num_src: usize,
        num_dst: usize,
    ) -> Result<Self, LinalgError> {
        let residuals = SummaryStats::from_slice(&result.residuals)?;
        Ok(Self {
            residuals,
            unmatched_src: num_src.saturating_sub(residuals.count),
            unmatched_dst: num_dst.saturating_sub(residuals.count),
        })
    }

    /// Number of matched pairs.
    #[inline]
    pub fn num_matches(&self) -> usize {
        self.residuals.count
    }
}
