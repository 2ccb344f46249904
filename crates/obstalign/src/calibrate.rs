use glam::DVec2;
use obstalign_linalg::LinalgError;
use obstalign_match::{estimate_initial_offset, match_obstacles, Match, MatchError, MatchingParams, Obstacle};

use crate::{fit_transform, AccuracyReport, FitError, TransformResult};

/// Error raised by [`calibrate`], tagged with the step that failed.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalibrationError {
    /// Offset estimation or matching failed.
    #[error("matching step failed: {0}")]
    Matching(#[from] MatchError),

    /// The transform could not be fitted.
    #[error("transform fitting step failed: {0}")]
    Fit(#[from] FitError),

    /// The accuracy report could not be computed.
    #[error("accuracy report failed: {0}")]
    Report(#[from] LinalgError),
}

/// Parameters of a full calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationParams {
    /// Correspondence solver parameters.
    pub matching: MatchingParams,
    /// Fail with [`FitError::DegenerateFit`] instead of reporting an
    /// identity rotation when the matches cannot determine one.
    pub reject_underdetermined: bool,
}

/// Outcome of a calibration run.
#[derive(Debug, Clone)]
pub struct Calibration {
    /// Translation used to seed the matching cost.
    pub initial_offset: DVec2,
    /// Accepted correspondences ordered by source index.
    pub matches: Vec<Match>,
    /// Fitted rigid transform.
    pub transform: TransformResult,
    /// Residual statistics and coverage.
    pub accuracy: AccuracyReport,
}

/// Match two obstacle sets and fit the rigid transform between them.
///
/// # Arguments
///
/// * `src` - Source (scenario) obstacles.
/// * `dst` - Destination (recorded) obstacles.
/// * `params` - Calibration parameters.
///
/// # Returns
///
/// The matches, the transform and its accuracy. A failing step aborts the
/// run, so no partial result is ever returned.
pub fn calibrate(
    src: &[Obstacle],
    dst: &[Obstacle],
    params: &CalibrationParams,
) -> Result<Calibration, CalibrationError> {
    log::info!(
        "Calibrating {} source against {} destination obstacles",
        src.len(),
        dst.len()
    );

    let initial_offset = match params.matching.initial_offset {
        Some(offset) => offset,
        None => estimate_initial_offset(src, dst)?,
    };

    let matching = MatchingParams {
        initial_offset: Some(initial_offset),
        ..params.matching
    };
    let matches = match_obstacles(src, dst, &matching)?;

    let transform = fit_transform(src, dst, &matches)?;
    if params.reject_underdetermined {
        transform.ensure_well_posed()?;
    }

    let accuracy = AccuracyReport::new(&transform, src.len(), dst.len())?;
    log::info!(
        "Residual error: mean={:.4} m, max={:.4} m, unmatched src={} dst={}",
        accuracy.residuals.mean,
        accuracy.residuals.max,
        accuracy.unmatched_src,
        accuracy.unmatched_dst
    );

    Ok(Calibration {
        initial_offset,
        matches,
        transform,
        accuracy,
    })
}
