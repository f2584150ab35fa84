//! Scheduler driver: ranks the graph once, then places tasks in priority order.

use std::collections::VecDeque;
use thiserror::Error;

use crate::config::SchedulerConfig;
use crate::graph::{GraphError, TaskGraph};
use crate::heterogeneity::HeterogeneityError;
use crate::logging::format_row;
use crate::models::{Schedule, ScheduledTask};
use crate::ranking::{rank_tasks, Ranking, RankingError};
use crate::{log_changes, log_checks, log_debug};

use super::selection::select_processor;
use super::state::SchedulerState;
use super::timing::evaluate;

/// Errors that can occur during scheduling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Ranking(#[from] RankingError),
    #[error("task {task}: {source}")]
    InvalidCost {
        task: usize,
        source: HeterogeneityError,
    },
    #[error("task {task} evaluated before its predecessor {predecessor} was scheduled")]
    PredecessorUnscheduled { task: usize, predecessor: usize },
    #[error("task {0} is already scheduled")]
    AlreadyScheduled(usize),
    #[error("task {0} is out of range")]
    TaskOutOfRange(usize),
    #[error("operation requires phase {expected:?}, scheduler is {found:?}")]
    InvalidPhase { expected: Phase, found: Phase },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Lifecycle of a scheduling run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed; ranks not computed yet.
    Unranked,
    /// Ranks and priority list exist; nothing scheduled yet.
    Ranked,
    /// At least one task popped from the priority list.
    Scheduling,
    /// Priority list exhausted.
    Done,
}

/// List scheduler for a task DAG on heterogeneous processors.
pub struct HeterogeneousScheduler<'g> {
    graph: &'g TaskGraph,
    config: SchedulerConfig,
    phase: Phase,
    ranking: Option<Ranking>,
    pending: VecDeque<usize>,
    state: SchedulerState,
    entries: Vec<ScheduledTask>,
}

impl<'g> HeterogeneousScheduler<'g> {
    /// Create a new scheduler.
    pub fn new(graph: &'g TaskGraph, config: SchedulerConfig) -> Result<Self, SchedulerError> {
        if !config.cross_threshold.is_finite() {
            return Err(SchedulerError::InvalidConfig(format!(
                "cross_threshold must be finite, got {}",
                config.cross_threshold
            )));
        }

        Ok(Self {
            graph,
            config,
            phase: Phase::Unranked,
            ranking: None,
            pending: VecDeque::new(),
            state: SchedulerState::new(graph.num_tasks(), graph.num_processors()),
            entries: Vec::with_capacity(graph.num_tasks()),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn ranking(&self) -> Option<&Ranking> {
        self.ranking.as_ref()
    }

    /// Tasks scheduled so far, in scheduling order.
    pub fn entries(&self) -> &[ScheduledTask] {
        &self.entries
    }

    /// Compute upward ranks and the priority list (Unranked -> Ranked).
    pub fn rank(&mut self) -> Result<&Ranking, SchedulerError> {
        if self.phase != Phase::Unranked {
            return Err(SchedulerError::InvalidPhase {
                expected: Phase::Unranked,
                found: self.phase,
            });
        }

        let verbosity = self.config.verbosity;
        self.log_inputs();

        let ranking = rank_tasks(self.graph)?;

        log_debug!(verbosity, "Ranks (base, upward):");
        for task in 0..self.graph.num_tasks() {
            log_debug!(
                verbosity,
                "  Task {}\t{}\t{}",
                task,
                ranking.base_ranks[task],
                ranking.upward_ranks[task]
            );
        }
        log_debug!(verbosity, "Priority list: {:?}", ranking.priority_list);

        self.pending = ranking.priority_list.iter().copied().collect();
        self.phase = Phase::Ranked;
        Ok(&*self.ranking.insert(ranking))
    }

    /// Schedule the next task in priority order.
    ///
    /// Returns `Ok(None)` once every task is placed (phase becomes Done).
    pub fn step(&mut self) -> Result<Option<&ScheduledTask>, SchedulerError> {
        match self.phase {
            Phase::Unranked => {
                return Err(SchedulerError::InvalidPhase {
                    expected: Phase::Ranked,
                    found: self.phase,
                })
            }
            Phase::Done => return Ok(None),
            Phase::Ranked | Phase::Scheduling => {}
        }

        let Some(task) = self.pending.pop_front() else {
            self.phase = Phase::Done;
            log_changes!(
                self.config.verbosity,
                "Schedule complete, makespan {}",
                self.entries.iter().map(|e| e.finish).fold(0.0, f64::max)
            );
            return Ok(None);
        };
        self.phase = Phase::Scheduling;

        let entry = self.schedule_task(task)?;
        self.entries.push(entry);
        Ok(self.entries.last())
    }

    /// Run to completion and return the schedule.
    ///
    /// Ranks first if needed; may be called after some manual `step`s.
    pub fn run(mut self) -> Result<Schedule, SchedulerError> {
        if self.phase == Phase::Unranked {
            self.rank()?;
        }
        while self.step()?.is_some() {}

        let ranking = self.ranking.take().ok_or(SchedulerError::InvalidPhase {
            expected: Phase::Done,
            found: self.phase,
        })?;

        Ok(Schedule {
            entries: self.entries,
            ranks: ranking.upward_ranks,
            priority_list: ranking.priority_list,
            processor_ready_times: self.state.ready_times().to_vec(),
        })
    }

    /// Evaluate, select, and record one task.
    fn schedule_task(&mut self, task: usize) -> Result<ScheduledTask, SchedulerError> {
        let verbosity = self.config.verbosity;
        log_checks!(verbosity, "Process task {}", task);

        let timing = evaluate(self.graph, &self.state, task)?;
        log_checks!(verbosity, "  EST\t{}", format_row(&timing.est));
        log_checks!(verbosity, "  EFT\t{}", format_row(&timing.eft));

        let exec_costs = self.graph.exec_costs(task);
        let selection = select_processor(exec_costs, &timing.eft, self.config.cross_threshold)
            .map_err(|source| SchedulerError::InvalidCost { task, source })?;
        if let Some(ratio) = selection.ratio {
            log_checks!(
                verbosity,
                "  Cross-over ratio {} (threshold {})",
                ratio,
                self.config.cross_threshold
            );
        }

        let processor = selection.processor;
        let start = timing.est[processor];
        let finish = timing.eft[processor];
        self.state.assign(task, processor, finish)?;

        log_changes!(
            verbosity,
            "Task {} -> processor {} [{}, {}] ({})",
            task,
            processor,
            start,
            finish,
            selection.rule
        );
        log_checks!(
            verbosity,
            "  Processor state:\t{}",
            format_row(self.state.ready_times())
        );

        Ok(ScheduledTask {
            task,
            processor,
            est: timing.est,
            eft: timing.eft,
            start,
            finish,
            rule: selection.rule,
        })
    }

    fn log_inputs(&self) {
        let verbosity = self.config.verbosity;
        let graph = self.graph;
        log_debug!(
            verbosity,
            "Tasks: {}\tProcessors: {}\tEdges: {}",
            graph.num_tasks(),
            graph.num_processors(),
            graph.num_edges()
        );
        log_debug!(verbosity, "Execution cost matrix:");
        for task in 0..graph.num_tasks() {
            log_debug!(verbosity, "  {}", format_row(graph.exec_costs(task)));
        }
        log_debug!(verbosity, "Edges:");
        for task in 0..graph.num_tasks() {
            for &succ in graph.successors(task) {
                log_debug!(
                    verbosity,
                    "  {} -> {}\t{}",
                    task,
                    succ,
                    graph.edge_weight(task, succ).unwrap_or(0.0)
                );
            }
        }
        log_debug!(verbosity, "Communication matrix:");
        for from in 0..graph.num_processors() {
            let row: Vec<f64> = (0..graph.num_processors())
                .map(|to| graph.comm_cost(from, to))
                .collect();
            log_debug!(verbosity, "  {}", format_row(&row));
        }
    }
}
