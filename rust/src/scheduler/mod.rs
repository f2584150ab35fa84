//! Heterogeneous list scheduler.
//!
//! Tasks are taken from the ranked priority list one at a time. For each task
//! the timing evaluator computes EST/EFT on every processor, the selector
//! picks a processor (minimum EFT, or the cross-over override), and the
//! shared state records the finish time and the processor's new ready time.

mod core;
mod selection;
mod state;
mod timing;

pub use self::core::{HeterogeneousScheduler, Phase, SchedulerError};
pub use selection::{
    max_eft_processor, min_eft_processor, select_processor, Selection, SelectionRule,
};
pub use state::SchedulerState;
pub use timing::{evaluate, Timing};
