//! Summary statistics over the magnitude of a metric series.

use crate::error::StatsError;

/// MIN / MAX / AVERAGE / population STDEV of absolute values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

impl Summary {
    /// Summarize `|v|` for every `v` in `values`.
    ///
    /// An empty input has no defined summary and yields `StatsError::Empty`.
    pub fn of_abs(values: &[f64]) -> Result<Self, StatsError> {
        if values.is_empty() {
            return Err(StatsError::Empty);
        }
        let n = values.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        for v in values.iter().map(|v| v.abs()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / n;
        // Two-pass population variance.
        let var = values
            .iter()
            .map(|v| (v.abs() - mean).powi(2))
            .sum::<f64>()
            / n;
        Ok(Self {
            min,
            max,
            mean,
            stdev: var.sqrt(),
        })
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.min, self.max, self.mean, self.stdev]
    }
}
