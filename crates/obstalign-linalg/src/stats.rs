use crate::LinalgError;

/// Mean and population standard deviation of a set of values.
///
/// Returns [`LinalgError::EmptyInput`] for an empty slice.
pub fn mean_std(values: &[f64]) -> Result<(f64, f64), LinalgError> {
    if values.is_empty() {
        return Err(LinalgError::EmptyInput);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok((mean, var.sqrt()))
}

/// Median of a set of values, averaging the two middle values for even counts.
pub fn median(values: &[f64]) -> Result<f64, LinalgError> {
    if values.is_empty() {
        return Err(LinalgError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Ok(sorted[mid])
    }
}

/// Descriptive statistics of a non-empty sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Largest sample.
    pub max: f64,
    /// Smallest sample.
    pub min: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl SummaryStats {
    /// Compute the statistics of `values`.
    ///
    /// # Arguments
    ///
    /// * `values` - A non-empty set of finite samples.
    pub fn from_slice(values: &[f64]) -> Result<Self, LinalgError> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LinalgError::NonFiniteInput);
        }
        let (mean, std) = mean_std(values)?;
        let median = median(values)?;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Ok(Self {
            count: values.len(),
            mean,
            median,
            max,
            min,
            std,
        })
    }
}
