//! Python bindings (enabled with the `python` feature).

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

use crate::config::{SchedulerConfig, CROSS_THRESHOLD};
use crate::graph::TaskGraph;
use crate::models::{Link, ScheduledTask};

/// A scheduled task as seen from Python.
#[pyclass(name = "ScheduledTask")]
#[derive(Clone, Debug)]
pub struct PyScheduledTask {
    #[pyo3(get)]
    pub task: usize,
    #[pyo3(get)]
    pub processor: usize,
    #[pyo3(get)]
    pub est: Vec<f64>,
    #[pyo3(get)]
    pub eft: Vec<f64>,
    #[pyo3(get)]
    pub start: f64,
    #[pyo3(get)]
    pub finish: f64,
    #[pyo3(get)]
    pub rule: String,
}

#[pymethods]
impl PyScheduledTask {
    fn __repr__(&self) -> String {
        format!(
            "ScheduledTask(task={}, processor={}, start={}, finish={})",
            self.task, self.processor, self.start, self.finish
        )
    }
}

impl From<ScheduledTask> for PyScheduledTask {
    fn from(entry: ScheduledTask) -> Self {
        Self {
            task: entry.task,
            processor: entry.processor,
            est: entry.est,
            eft: entry.eft,
            start: entry.start,
            finish: entry.finish,
            rule: entry.rule.to_string(),
        }
    }
}

/// Schedule a task graph given as dense matrices.
///
/// # Arguments
/// * `exec_costs` - Task x processor execution costs
/// * `edges` - Task x task edge weights; `None` means no edge, diagonal ignored
/// * `comm_costs` - Processor x processor per-unit transfer costs
///
/// # Returns
/// * List of ScheduledTask in scheduling order
///
/// # Raises
/// * ValueError on shape mismatch, non-positive costs, or a cyclic graph
#[pyfunction]
#[pyo3(signature = (exec_costs, edges, comm_costs, cross_threshold=CROSS_THRESHOLD, verbosity=0))]
fn schedule(
    exec_costs: Vec<Vec<f64>>,
    edges: Vec<Vec<Option<f64>>>,
    comm_costs: Vec<Vec<f64>>,
    cross_threshold: f64,
    verbosity: u8,
) -> PyResult<Vec<PyScheduledTask>> {
    let links: Vec<Vec<Link>> = edges
        .into_iter()
        .enumerate()
        .map(|(from, row)| {
            row.into_iter()
                .enumerate()
                .map(|(to, weight)| match weight {
                    _ if from == to => Link::Itself,
                    Some(w) => Link::Edge(w),
                    None => Link::NoEdge,
                })
                .collect()
        })
        .collect();

    let config = SchedulerConfig {
        cross_threshold,
        verbosity,
    };

    let result = TaskGraph::new(exec_costs, links, comm_costs)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
        .and_then(|graph| {
            crate::schedule(&graph, &config)
                .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
        })?;

    Ok(result.entries.into_iter().map(Into::into).collect())
}

/// The hetsched Python module.
#[pymodule]
fn hetsched(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyScheduledTask>()?;
    m.add("CROSS_THRESHOLD", CROSS_THRESHOLD)?;
    m.add_function(wrap_pyfunction!(schedule, m)?)?;
    Ok(())
}
