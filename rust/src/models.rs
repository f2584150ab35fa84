//! Core data types for the scheduling system.

use std::fmt;

use crate::logging::format_row;
use crate::scheduler::SelectionRule;

/// One cell of the dense task-by-task edge matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Link {
    /// No dependency between the two tasks.
    NoEdge,
    /// Diagonal entry: the task itself, no transfer.
    Itself,
    /// Dependency carrying `weight` units of data from row task to column task.
    Edge(f64),
}

impl Link {
    pub fn weight(&self) -> Option<f64> {
        match self {
            Link::Edge(w) => Some(*w),
            Link::NoEdge | Link::Itself => None,
        }
    }
}

/// A task that has been placed on a processor.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    pub task: usize,
    pub processor: usize,
    /// Earliest start time on every processor at the moment of evaluation.
    pub est: Vec<f64>,
    /// Earliest finish time on every processor at the moment of evaluation.
    pub eft: Vec<f64>,
    /// Start time on the chosen processor.
    pub start: f64,
    /// Actual finish time (EFT on the chosen processor).
    pub finish: f64,
    /// Which branch of the selection policy decided the processor.
    pub rule: SelectionRule,
}

/// Result of a full scheduling run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    /// Scheduled tasks, in scheduling order.
    pub entries: Vec<ScheduledTask>,
    /// Upward rank per task (task-indexed).
    pub ranks: Vec<f64>,
    /// Task indices in the order they were scheduled.
    pub priority_list: Vec<usize>,
    /// Time at which each processor becomes free after the last assignment.
    pub processor_ready_times: Vec<f64>,
}

impl Schedule {
    /// Overall finish time: the latest finish over all tasks (0 for an empty graph).
    pub fn makespan(&self) -> f64 {
        self.entries.iter().map(|e| e.finish).fold(0.0, f64::max)
    }

    /// Look up the scheduled entry for a task.
    pub fn entry(&self, task: usize) -> Option<&ScheduledTask> {
        self.entries.iter().find(|e| e.task == task)
    }

    /// Processor assigned to each task, indexed by task.
    pub fn assignment(&self) -> Vec<usize> {
        let mut assigned = vec![0; self.entries.len()];
        for entry in &self.entries {
            if let Some(slot) = assigned.get_mut(entry.task) {
                *slot = entry.processor;
            }
        }
        assigned
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task scheduling order:")?;
        for entry in &self.entries {
            writeln!(
                f,
                "Task {} with EFT {} on Processor {} ({})",
                entry.task, entry.finish, entry.processor, entry.rule
            )?;
        }
        writeln!(
            f,
            "Processor state:\t{}",
            format_row(&self.processor_ready_times)
        )?;
        write!(f, "Makespan: {}", self.makespan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(task: usize, processor: usize, start: f64, finish: f64) -> ScheduledTask {
        ScheduledTask {
            task,
            processor,
            est: vec![start, start],
            eft: vec![finish, finish],
            start,
            finish,
            rule: SelectionRule::MinEft,
        }
    }

    #[test]
    fn test_link_weight() {
        assert_eq!(Link::Edge(2.5).weight(), Some(2.5));
        assert_eq!(Link::Edge(0.0).weight(), Some(0.0));
        assert_eq!(Link::NoEdge.weight(), None);
        assert_eq!(Link::Itself.weight(), None);
    }

    #[test]
    fn test_makespan_and_assignment() {
        let schedule = Schedule {
            entries: vec![make_entry(1, 0, 0.0, 3.0), make_entry(0, 1, 0.0, 4.0)],
            ranks: vec![1.0, 1.2],
            priority_list: vec![1, 0],
            processor_ready_times: vec![3.0, 4.0],
        };
        assert_eq!(schedule.makespan(), 4.0);
        assert_eq!(schedule.assignment(), vec![1, 0]);
        assert_eq!(schedule.entry(0).map(|e| e.processor), Some(1));
        assert!(schedule.entry(5).is_none());
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::default();
        assert!(schedule.is_empty());
        assert_eq!(schedule.makespan(), 0.0);
    }

    #[test]
    fn test_display_lists_order() {
        let schedule = Schedule {
            entries: vec![make_entry(1, 0, 0.0, 3.0)],
            ranks: vec![0.0, 1.2],
            priority_list: vec![1],
            processor_ready_times: vec![3.0, 0.0],
        };
        let text = schedule.to_string();
        assert!(text.contains("Task 1 with EFT 3 on Processor 0"));
        assert!(text.contains("Processor state:\t3\t0"));
        assert!(text.ends_with("Makespan: 3"));
    }
}
