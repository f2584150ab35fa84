//! Heterogeneity metric over per-processor cost vectors.

use thiserror::Error;

/// Errors from the heterogeneity metric.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeterogeneityError {
    #[error("invalid cost: empty cost vector")]
    Empty,
    #[error("invalid cost: non-positive value {0}")]
    NonPositive(f64),
    #[error("invalid cost: non-finite value {0}")]
    NonFinite(f64),
}

/// Compute `(max - min) / (max / min)` over a vector of strictly positive costs.
///
/// Used both on a task's execution-cost row and on its EFT vector. A
/// uniform vector yields 0.
pub fn heterogeneity(values: &[f64]) -> Result<f64, HeterogeneityError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_nan() || v <= 0.0 {
            return Err(HeterogeneityError::NonPositive(v));
        }
        if v.is_infinite() {
            return Err(HeterogeneityError::NonFinite(v));
        }
        min = min.min(v);
        max = max.max(v);
    }
    if values.is_empty() {
        return Err(HeterogeneityError::Empty);
    }
    Ok((max - min) / (max / min))
}
