//! Cooperative, time-sliced tasks.
//!
//! A run is driven by an external scheduler that calls in at a roughly
//! fixed cadence. Nothing here is preempted: every [`Task::resume`] checks
//! its own elapsed time through [`run_bounded`] and returns once its
//! budget is spent. A single slow marker lookup or materialize call can
//! still overrun the budget, since the budget is only checked between
//! units.
//!
//! # Lifecycle
//!
//! ```text
//! Running --[work exhausted]--> Finished
//! Running --[cancel()]--------> Cancelled
//! ```
//!
//! Finished and Cancelled are both terminal and both make
//! [`Task::is_finished`] true, but they stay distinguishable through
//! [`Task::state`].

mod bounded;
mod progress;

pub use bounded::{run_bounded, SliceOutcome, Step, StopReason};
pub use progress::ProgressReport;

use std::fmt;

use tracing::info;

/// Externally observable task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// More work remains.
    Running,
    /// All work was completed.
    Finished,
    /// Stopped by request before completing.
    Cancelled,
}

impl TaskState {
    /// Returns true for `Finished` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Running => "running",
            TaskState::Finished => "finished",
            TaskState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// One resumable unit of a run.
pub trait Task: Send {
    /// Short name used in log lines, e.g. `"inspect"`.
    fn label(&self) -> &'static str;

    /// Runs one bounded slice of work. No-op once terminal.
    fn resume(&mut self);

    /// Requests a cooperative stop. Takes effect before the next unit.
    fn cancel(&mut self);

    /// Current state.
    fn state(&self) -> TaskState;

    /// Returns true once the task is `Finished` or `Cancelled`.
    fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Snapshot of progress so far.
    fn progress(&mut self) -> ProgressReport;

    /// Emits a progress line. Called periodically by the orchestrator.
    fn log_progress(&mut self) {
        let report = self.progress();
        info!(
            task = report.label,
            processed = report.processed,
            total = report.total,
            "{}",
            report
        );
    }
}
