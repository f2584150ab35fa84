//! Upward-rank priority computation.
//!
//! A task's base rank is the heterogeneity of its execution-cost row. Its
//! upward rank adds the largest `successor rank + edge weight` over all direct
//! successors, so sinks rank lowest and every task outranks its successors.

use thiserror::Error;

use crate::graph::{GraphError, TaskGraph};
use crate::heterogeneity::{heterogeneity, HeterogeneityError};

/// Errors from the ranking step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("task {task}: {source}")]
    InvalidCost {
        task: usize,
        source: HeterogeneityError,
    },
}

/// Ranks and scheduling order for a task graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    /// Heterogeneity of each task's execution costs.
    pub base_ranks: Vec<f64>,
    /// Critical-path style rank to any sink.
    pub upward_ranks: Vec<f64>,
    /// Task indices in scheduling order (highest upward rank first).
    pub priority_list: Vec<usize>,
}

/// Compute base ranks, upward ranks, and the priority list.
///
/// Successor ranks are resolved by walking a topological order backwards, so
/// edges may point in any index direction. Equal ranks are ordered by
/// topological position, which keeps every predecessor ahead of its
/// successors even when a zero-weight edge joins two tasks with uniform costs.
///
/// # Returns
/// * `Err(RankingError::Graph(GraphError::NotAcyclic))` if the graph has a cycle
pub fn rank_tasks(graph: &TaskGraph) -> Result<Ranking, RankingError> {
    let topo_order = graph.topological_order()?;
    let n = graph.num_tasks();

    let base_ranks = (0..n)
        .map(|task| {
            heterogeneity(graph.exec_costs(task))
                .map_err(|source| RankingError::InvalidCost { task, source })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let mut upward_ranks = vec![0.0; n];
    for &task in topo_order.iter().rev() {
        let heaviest_successor = graph
            .successors(task)
            .iter()
            .map(|&succ| upward_ranks[succ] + graph.edge_weight(task, succ).unwrap_or(0.0))
            .fold(0.0, f64::max);
        upward_ranks[task] = base_ranks[task] + heaviest_successor;
    }

    let mut topo_position = vec![0; n];
    for (position, &task) in topo_order.iter().enumerate() {
        topo_position[task] = position;
    }

    let mut priority_list: Vec<usize> = (0..n).collect();
    priority_list.sort_by(|&a, &b| {
        upward_ranks[b]
            .total_cmp(&upward_ranks[a])
            .then(topo_position[a].cmp(&topo_position[b]))
    });

    Ok(Ranking {
        base_ranks,
        upward_ranks,
        priority_list,
    })
}
