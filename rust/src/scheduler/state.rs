//! Mutable scheduling state: processor ready times and per-task placements.

use super::core::SchedulerError;

/// Per-run state threaded through timing evaluation and processor selection.
///
/// A task's processor and finish time are written exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerState {
    /// Time at which each processor becomes free.
    ready_times: Vec<f64>,
    /// (processor, finish time) per task, `None` until scheduled.
    placements: Vec<Option<(usize, f64)>>,
}

impl SchedulerState {
    /// Create a state with all processors free at time 0 and no task placed.
    pub fn new(num_tasks: usize, num_processors: usize) -> Self {
        Self {
            ready_times: vec![0.0; num_processors],
            placements: vec![None; num_tasks],
        }
    }

    pub fn ready_times(&self) -> &[f64] {
        &self.ready_times
    }

    pub fn ready_time(&self, processor: usize) -> f64 {
        self.ready_times[processor]
    }

    /// Processor and finish time of a scheduled task.
    pub fn placement(&self, task: usize) -> Option<(usize, f64)> {
        self.placements.get(task).copied().flatten()
    }

    pub fn processor_of(&self, task: usize) -> Option<usize> {
        self.placement(task).map(|(processor, _)| processor)
    }

    pub fn finish_time(&self, task: usize) -> Option<f64> {
        self.placement(task).map(|(_, finish)| finish)
    }

    pub fn is_scheduled(&self, task: usize) -> bool {
        self.placement(task).is_some()
    }

    /// Number of tasks placed so far.
    pub fn scheduled_count(&self) -> usize {
        self.placements.iter().filter(|p| p.is_some()).count()
    }

    /// Place `task` on `processor`, finishing at `finish`, and advance the
    /// processor's ready time.
    ///
    /// # Returns
    /// * `Err(SchedulerError::AlreadyScheduled)` if the task was placed before
    pub fn assign(
        &mut self,
        task: usize,
        processor: usize,
        finish: f64,
    ) -> Result<(), SchedulerError> {
        match self.placements.get_mut(task) {
            Some(Some(_)) => Err(SchedulerError::AlreadyScheduled(task)),
            Some(slot) => {
                *slot = Some((processor, finish));
                self.ready_times[processor] = finish;
                Ok(())
            }
            None => Err(SchedulerError::TaskOutOfRange(task)),
        }
    }
}
