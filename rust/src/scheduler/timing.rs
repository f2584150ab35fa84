//! Earliest start / earliest finish time evaluation.

use crate::graph::TaskGraph;

use super::core::SchedulerError;
use super::state::SchedulerState;

/// EST and EFT of one task on every processor.
#[derive(Clone, Debug, PartialEq)]
pub struct Timing {
    pub est: Vec<f64>,
    pub eft: Vec<f64>,
}

/// Compute EST and EFT of `task` on every processor.
///
/// Data from predecessor `i` arrives on processor `p` at
/// `finish(i) + comm(proc(i), p) * weight(i, task)`; the diagonal of the
/// communication matrix is used as-is for same-processor transfers.
/// `EST(p) = max(ready(p), latest arrival)` and `EFT(p) = EST(p) + cost(task, p)`.
///
/// # Returns
/// * `Err(SchedulerError::PredecessorUnscheduled)` if any predecessor has no placement
pub fn evaluate(
    graph: &TaskGraph,
    state: &SchedulerState,
    task: usize,
) -> Result<Timing, SchedulerError> {
    let num_processors = graph.num_processors();
    let mut arrivals = vec![0.0_f64; num_processors];

    for &pred in graph.predecessors(task) {
        let (pred_processor, pred_finish) =
            state
                .placement(pred)
                .ok_or(SchedulerError::PredecessorUnscheduled {
                    task,
                    predecessor: pred,
                })?;
        let weight = graph.edge_weight(pred, task).unwrap_or(0.0);

        for (processor, arrival) in arrivals.iter_mut().enumerate() {
            let candidate = pred_finish + graph.comm_cost(pred_processor, processor) * weight;
            *arrival = arrival.max(candidate);
        }
    }

    let est: Vec<f64> = arrivals
        .iter()
        .enumerate()
        .map(|(processor, &arrival)| state.ready_time(processor).max(arrival))
        .collect();
    let eft = est
        .iter()
        .enumerate()
        .map(|(processor, &start)| start + graph.exec_cost(task, processor))
        .collect();

    Ok(Timing { est, eft })
}
