//! Static list scheduling of task DAGs onto heterogeneous processors.
//!
//! Tasks are ranked by upward rank (cost heterogeneity plus the heaviest
//! successor path), then placed one at a time on the processor chosen by a
//! minimum-EFT rule with a cross-over override for highly heterogeneous tasks.

pub mod config;
pub mod graph;
pub mod heterogeneity;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod scheduler;

#[cfg(feature = "python")]
mod python;

pub use config::{SchedulerConfig, CROSS_THRESHOLD};
pub use graph::{GraphError, TaskGraph, TaskGraphBuilder};
pub use heterogeneity::{heterogeneity, HeterogeneityError};
pub use models::{Link, Schedule, ScheduledTask};
pub use ranking::{rank_tasks, Ranking, RankingError};
pub use scheduler::{HeterogeneousScheduler, Phase, SchedulerError, SelectionRule};

/// Rank and schedule every task of `graph`.
///
/// # Returns
/// * `Ok(Schedule)` with one entry per task, in scheduling order
/// * `Err(SchedulerError)` if the graph is cyclic or the configuration is invalid
pub fn schedule(graph: &TaskGraph, config: &SchedulerConfig) -> Result<Schedule, SchedulerError> {
    HeterogeneousScheduler::new(graph, config.clone())?.run()
}
