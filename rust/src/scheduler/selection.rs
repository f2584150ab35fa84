//! Processor selection: minimum EFT with the cross-over override.

use std::fmt;

use crate::heterogeneity::{heterogeneity, HeterogeneityError};

/// Which branch of the selection policy chose the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRule {
    /// Minimum-EFT processor that is also the cheapest for the task.
    CheapestMinEft,
    /// Override to the maximum-EFT processor (ratio at or above the threshold).
    CrossOver,
    /// Minimum-EFT processor kept because the ratio stayed below the threshold.
    MinEft,
}

impl fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionRule::CheapestMinEft => write!(f, "min EFT, cheapest"),
            SelectionRule::CrossOver => write!(f, "cross-over"),
            SelectionRule::MinEft => write!(f, "min EFT"),
        }
    }
}

/// Outcome of processor selection for one task.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub processor: usize,
    pub rule: SelectionRule,
    /// `heterogeneity(costs) / heterogeneity(efts)`, when the override was considered.
    pub ratio: Option<f64>,
}

/// Index of the minimum EFT. Ties go to the highest index.
pub fn min_eft_processor(eft: &[f64]) -> usize {
    let mut best = 0;
    let mut min = f64::INFINITY;
    for (processor, &value) in eft.iter().enumerate() {
        if value <= min {
            best = processor;
            min = value;
        }
    }
    best
}

/// Index of the maximum EFT. Ties go to the highest index.
pub fn max_eft_processor(eft: &[f64]) -> usize {
    let mut best = 0;
    let mut max = eft.first().copied().unwrap_or(f64::NEG_INFINITY);
    for (processor, &value) in eft.iter().enumerate() {
        if max <= value {
            best = processor;
            max = value;
        }
    }
    best
}

/// Choose a processor for a task from its execution costs and EFT vector.
///
/// 1. Take the minimum-EFT processor; keep it if its execution cost is the
///    task's cheapest.
/// 2. Otherwise compute `heterogeneity(costs) / heterogeneity(efts)`; at or
///    above `cross_threshold`, switch to the maximum-EFT processor.
/// 3. Otherwise keep the minimum-EFT processor.
///
/// A uniform EFT vector has zero heterogeneity and makes the ratio infinite.
pub fn select_processor(
    exec_costs: &[f64],
    eft: &[f64],
    cross_threshold: f64,
) -> Result<Selection, HeterogeneityError> {
    let best = min_eft_processor(eft);
    let cheapest = exec_costs.iter().copied().fold(f64::INFINITY, f64::min);

    if exec_costs[best] <= cheapest {
        return Ok(Selection {
            processor: best,
            rule: SelectionRule::CheapestMinEft,
            ratio: None,
        });
    }

    let cost_spread = heterogeneity(exec_costs)?;
    let eft_spread = heterogeneity(eft)?;
    let ratio = if eft_spread == 0.0 {
        f64::INFINITY
    } else {
        cost_spread / eft_spread
    };

    if ratio >= cross_threshold {
        Ok(Selection {
            processor: max_eft_processor(eft),
            rule: SelectionRule::CrossOver,
            ratio: Some(ratio),
        })
    } else {
        Ok(Selection {
            processor: best,
            rule: SelectionRule::MinEft,
            ratio: Some(ratio),
        })
    }
}
