//! Task graph model: tasks, per-processor costs, and weighted precedence edges.

use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::models::Link;

/// Errors raised while building or traversing a task graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("shape mismatch: at least one processor is required")]
    NoProcessors,
    #[error("shape mismatch: {what} has {found} rows, expected {expected}")]
    RowCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("shape mismatch: {what} row {row} has {found} columns, expected {expected}")]
    RowLength {
        what: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid cost: non-positive value {value} for task {task} on processor {processor}")]
    InvalidCost {
        task: usize,
        processor: usize,
        value: f64,
    },
    #[error("invalid communication cost {value} from processor {from} to processor {to}")]
    InvalidCommCost { from: usize, to: usize, value: f64 },
    #[error("invalid edge weight {weight} on edge {from} -> {to}")]
    InvalidEdgeWeight { from: usize, to: usize, weight: f64 },
    #[error("self link at ({from}, {to}) is only allowed on the diagonal")]
    MisplacedSelfLink { from: usize, to: usize },
    #[error("edge {from} -> {to} references a task outside 0..{num_tasks}")]
    TaskOutOfRange {
        from: usize,
        to: usize,
        num_tasks: usize,
    },
    #[error("graph not acyclic")]
    NotAcyclic,
}

/// Immutable task graph with dense cost matrices and sparse edge storage.
#[derive(Clone, Debug)]
pub struct TaskGraph {
    /// Execution cost per task (rows) and processor (columns).
    exec_costs: Vec<Vec<f64>>,
    /// Per-unit transfer cost between processor pairs (not assumed symmetric).
    comm_costs: Vec<Vec<f64>>,
    /// Edge weights keyed by (predecessor, successor).
    weights: FxHashMap<(usize, usize), f64>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl TaskGraph {
    /// Build a graph from the dense matrices of the external interface.
    ///
    /// `links[i][j]` describes the edge from task `i` to task `j`; `Link::Itself`
    /// may only appear on the diagonal.
    pub fn new(
        exec_costs: Vec<Vec<f64>>,
        links: Vec<Vec<Link>>,
        comm_costs: Vec<Vec<f64>>,
    ) -> Result<Self, GraphError> {
        let n = exec_costs.len();
        if links.len() != n {
            return Err(GraphError::RowCount {
                what: "edge matrix",
                expected: n,
                found: links.len(),
            });
        }

        let mut edges = Vec::new();
        for (from, row) in links.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::RowLength {
                    what: "edge matrix",
                    row: from,
                    expected: n,
                    found: row.len(),
                });
            }
            for (to, link) in row.iter().enumerate() {
                match link {
                    Link::NoEdge => {}
                    Link::Itself if from == to => {}
                    Link::Itself => return Err(GraphError::MisplacedSelfLink { from, to }),
                    Link::Edge(weight) => edges.push((from, to, *weight)),
                }
            }
        }

        Self::from_parts(exec_costs, edges, comm_costs)
    }

    /// Start building a graph incrementally over the given communication matrix.
    pub fn builder(comm_costs: Vec<Vec<f64>>) -> TaskGraphBuilder {
        TaskGraphBuilder::new(comm_costs)
    }

    fn from_parts(
        exec_costs: Vec<Vec<f64>>,
        edges: Vec<(usize, usize, f64)>,
        comm_costs: Vec<Vec<f64>>,
    ) -> Result<Self, GraphError> {
        let num_processors = comm_costs.len();
        if num_processors == 0 {
            return Err(GraphError::NoProcessors);
        }

        for (from, row) in comm_costs.iter().enumerate() {
            if row.len() != num_processors {
                return Err(GraphError::RowLength {
                    what: "communication matrix",
                    row: from,
                    expected: num_processors,
                    found: row.len(),
                });
            }
            for (to, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(GraphError::InvalidCommCost { from, to, value });
                }
            }
        }

        for (task, row) in exec_costs.iter().enumerate() {
            if row.len() != num_processors {
                return Err(GraphError::RowLength {
                    what: "execution cost matrix",
                    row: task,
                    expected: num_processors,
                    found: row.len(),
                });
            }
            for (processor, &value) in row.iter().enumerate() {
                if !value.is_finite() || value <= 0.0 {
                    return Err(GraphError::InvalidCost {
                        task,
                        processor,
                        value,
                    });
                }
            }
        }

        let num_tasks = exec_costs.len();
        let mut weights: FxHashMap<(usize, usize), f64> =
            FxHashMap::with_capacity_and_hasher(edges.len(), Default::default());
        for (from, to, weight) in edges {
            if from >= num_tasks || to >= num_tasks {
                return Err(GraphError::TaskOutOfRange {
                    from,
                    to,
                    num_tasks,
                });
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphError::InvalidEdgeWeight { from, to, weight });
            }
            weights.insert((from, to), weight);
        }

        // Sorted so adjacency lists do not depend on hash iteration order
        let mut keys: Vec<(usize, usize)> = weights.keys().copied().collect();
        keys.sort_unstable();

        let mut successors = vec![Vec::new(); num_tasks];
        let mut predecessors = vec![Vec::new(); num_tasks];
        for (from, to) in keys {
            successors[from].push(to);
            predecessors[to].push(from);
        }

        Ok(Self {
            exec_costs,
            comm_costs,
            weights,
            successors,
            predecessors,
        })
    }

    pub fn num_tasks(&self) -> usize {
        self.exec_costs.len()
    }

    pub fn num_processors(&self) -> usize {
        self.comm_costs.len()
    }

    /// Execution costs of `task` on every processor.
    pub fn exec_costs(&self, task: usize) -> &[f64] {
        &self.exec_costs[task]
    }

    pub fn exec_cost(&self, task: usize, processor: usize) -> f64 {
        self.exec_costs[task][processor]
    }

    /// Cheapest execution cost of `task` over all processors.
    pub fn min_exec_cost(&self, task: usize) -> f64 {
        self.exec_costs[task]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Per-unit transfer cost from processor `from` to processor `to`.
    pub fn comm_cost(&self, from: usize, to: usize) -> f64 {
        self.comm_costs[from][to]
    }

    pub fn edge_weight(&self, from: usize, to: usize) -> Option<f64> {
        self.weights.get(&(from, to)).copied()
    }

    pub fn num_edges(&self) -> usize {
        self.weights.len()
    }

    pub fn successors(&self, task: usize) -> &[usize] {
        &self.successors[task]
    }

    pub fn predecessors(&self, task: usize) -> &[usize] {
        &self.predecessors[task]
    }

    /// Topological order via Kahn's algorithm.
    ///
    /// Among simultaneously ready tasks the lowest index is emitted first, so
    /// the order is deterministic and equals index order for a graph without
    /// edges.
    ///
    /// # Returns
    /// * `Err(GraphError::NotAcyclic)` if any cycle (including a self edge) exists
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        let n = self.num_tasks();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(task, _)| Reverse(task))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(task)) = ready.pop() {
            order.push(task);
            for &succ in &self.successors[task] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if order.len() != n {
            return Err(GraphError::NotAcyclic);
        }
        Ok(order)
    }
}

/// Incremental construction of a [`TaskGraph`]; all validation happens in `build`.
#[derive(Clone, Debug, Default)]
pub struct TaskGraphBuilder {
    exec_costs: Vec<Vec<f64>>,
    edges: Vec<(usize, usize, f64)>,
    comm_costs: Vec<Vec<f64>>,
}

impl TaskGraphBuilder {
    pub fn new(comm_costs: Vec<Vec<f64>>) -> Self {
        Self {
            exec_costs: Vec::new(),
            edges: Vec::new(),
            comm_costs,
        }
    }

    /// Add a task with its per-processor execution costs; returns its index.
    pub fn add_task(&mut self, costs: Vec<f64>) -> usize {
        self.exec_costs.push(costs);
        self.exec_costs.len() - 1
    }

    /// Add a precedence edge. A repeated `(from, to)` pair keeps the last weight.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> &mut Self {
        self.edges.push((from, to, weight));
        self
    }

    pub fn build(self) -> Result<TaskGraph, GraphError> {
        TaskGraph::from_parts(self.exec_costs, self.edges, self.comm_costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comm2() -> Vec<Vec<f64>> {
        vec![vec![0.0, 1.0], vec![1.0, 0.0]]
    }

    fn no_edges(n: usize) -> Vec<Vec<Link>> {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { Link::Itself } else { Link::NoEdge })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_dense_construction() {
        let mut links = no_edges(3);
        links[0][2] = Link::Edge(1.0);
        links[0][1] = Link::Edge(0.0);
        let graph = TaskGraph::new(
            vec![vec![2.0, 4.0], vec![3.0, 5.0], vec![4.0, 6.0]],
            links,
            comm2(),
        )
        .unwrap();

        assert_eq!(graph.num_tasks(), 3);
        assert_eq!(graph.num_processors(), 2);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.successors(0), &[1, 2]);
        assert_eq!(graph.predecessors(2), &[0]);
        // Zero-weight edge is still an edge
        assert_eq!(graph.edge_weight(0, 1), Some(0.0));
        assert_eq!(graph.edge_weight(1, 2), None);
        assert_eq!(graph.min_exec_cost(2), 4.0);
        assert_eq!(graph.comm_cost(0, 1), 1.0);
    }

    #[test]
    fn test_builder_matches_dense() {
        let mut builder = TaskGraph::builder(comm2());
        let a = builder.add_task(vec![1.0, 2.0]);
        let b = builder.add_task(vec![3.0, 1.0]);
        builder.add_edge(a, b, 4.0);
        let graph = builder.build().unwrap();

        assert_eq!(graph.edge_weight(a, b), Some(4.0));
        assert_eq!(graph.successors(a), &[b]);
        assert_eq!(graph.exec_costs(b), &[3.0, 1.0]);
    }

    #[test]
    fn test_builder_repeated_edge_keeps_last_weight() {
        let mut builder = TaskGraph::builder(comm2());
        builder.add_task(vec![1.0, 2.0]);
        builder.add_task(vec![1.0, 2.0]);
        builder.add_edge(0, 1, 4.0).add_edge(0, 1, 6.0);
        let graph = builder.build().unwrap();
        assert_eq!(graph.edge_weight(0, 1), Some(6.0));
        assert_eq!(graph.successors(0), &[1]);
    }

    #[test]
    fn test_exec_row_length_mismatch() {
        let result = TaskGraph::new(vec![vec![1.0, 2.0], vec![1.0]], no_edges(2), comm2());
        assert_eq!(
            result.unwrap_err(),
            GraphError::RowLength {
                what: "execution cost matrix",
                row: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_edge_matrix_not_square() {
        let result = TaskGraph::new(vec![vec![1.0, 2.0]; 2], no_edges(3), comm2());
        assert!(matches!(result, Err(GraphError::RowCount { .. })));

        let mut links = no_edges(2);
        links[1].pop();
        let result = TaskGraph::new(vec![vec![1.0, 2.0]; 2], links, comm2());
        assert!(matches!(result, Err(GraphError::RowLength { row: 1, .. })));
    }

    #[test]
    fn test_comm_matrix_not_square() {
        let result = TaskGraph::new(
            vec![vec![1.0, 2.0]],
            no_edges(1),
            vec![vec![0.0, 1.0], vec![1.0]],
        );
        assert!(matches!(
            result,
            Err(GraphError::RowLength {
                what: "communication matrix",
                ..
            })
        ));
    }

    #[test]
    fn test_no_processors() {
        let result = TaskGraph::new(vec![], vec![], vec![]);
        assert_eq!(result.unwrap_err(), GraphError::NoProcessors);
    }

    #[test]
    fn test_zero_cost_rejected() {
        let result = TaskGraph::new(vec![vec![1.0, 0.0]], no_edges(1), comm2());
        let err = result.unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidCost {
                task: 0,
                processor: 1,
                value: 0.0
            }
        );
        assert!(err.to_string().starts_with("invalid cost: non-positive value"));
    }

    #[test]
    fn test_negative_weights_rejected() {
        let mut links = no_edges(2);
        links[0][1] = Link::Edge(-1.0);
        let result = TaskGraph::new(vec![vec![1.0, 2.0]; 2], links, comm2());
        assert!(matches!(result, Err(GraphError::InvalidEdgeWeight { .. })));

        let result = TaskGraph::new(
            vec![vec![1.0, 2.0]],
            no_edges(1),
            vec![vec![0.0, -1.0], vec![1.0, 0.0]],
        );
        assert!(matches!(result, Err(GraphError::InvalidCommCost { .. })));
    }

    #[test]
    fn test_misplaced_self_link() {
        let mut links = no_edges(2);
        links[0][1] = Link::Itself;
        let result = TaskGraph::new(vec![vec![1.0, 2.0]; 2], links, comm2());
        assert_eq!(
            result.unwrap_err(),
            GraphError::MisplacedSelfLink { from: 0, to: 1 }
        );
    }

    #[test]
    fn test_builder_out_of_range_edge() {
        let mut builder = TaskGraph::builder(comm2());
        builder.add_task(vec![1.0, 2.0]);
        builder.add_edge(0, 3, 1.0);
        assert!(matches!(
            builder.build(),
            Err(GraphError::TaskOutOfRange { to: 3, .. })
        ));
    }

    #[test]
    fn test_topological_order_reverse_indices() {
        // 2 -> 1 -> 0
        let mut builder = TaskGraph::builder(comm2());
        for _ in 0..3 {
            builder.add_task(vec![1.0, 2.0]);
        }
        builder.add_edge(2, 1, 1.0).add_edge(1, 0, 1.0);
        let graph = builder.build().unwrap();
        assert_eq!(graph.topological_order().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_topological_order_without_edges_is_index_order() {
        let graph = TaskGraph::new(vec![vec![1.0, 2.0]; 4], no_edges(4), comm2()).unwrap();
        assert_eq!(graph.topological_order().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_mutual_edges_not_acyclic() {
        let mut links = no_edges(2);
        links[0][1] = Link::Edge(1.0);
        links[1][0] = Link::Edge(1.0);
        let graph = TaskGraph::new(vec![vec![1.0, 2.0]; 2], links, comm2()).unwrap();
        assert_eq!(graph.topological_order(), Err(GraphError::NotAcyclic));
    }

    #[test]
    fn test_diagonal_edge_is_a_cycle() {
        let mut links = no_edges(1);
        links[0][0] = Link::Edge(1.0);
        let graph = TaskGraph::new(vec![vec![1.0, 2.0]], links, comm2()).unwrap();
        assert_eq!(graph.topological_order(), Err(GraphError::NotAcyclic));
    }
}
