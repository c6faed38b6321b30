//! The generating task.

use std::iter::Peekable;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{MaterializeError, Materializer};
use crate::sparse::{GridIndex, IntoCoords};
use crate::task::{run_bounded, ProgressReport, Step, StopReason, Task, TaskState};
use crate::throttle::{GenerationGate, ThrottleReading};

/// Label used in progress lines.
pub const GENERATE_LABEL: &str = "generate";

/// Materializes pending cells in ascending order, a budget's worth per tick.
///
/// A closed gate skips the whole tick. The rate is measured over time spent
/// inside ticks only, so long throttled pauses do not drag it down.
pub struct GenerationTask {
    remaining: Peekable<IntoCoords>,
    materializer: Box<dyn Materializer>,
    gate: Box<dyn GenerationGate>,
    budget: Duration,
    processed: u64,
    total: u64,
    active: Duration,
    cancel: CancellationToken,
    state: TaskState,
    last_reading: Option<ThrottleReading>,
}

impl GenerationTask {
    pub fn new(
        pending: GridIndex,
        materializer: Box<dyn Materializer>,
        gate: Box<dyn GenerationGate>,
        budget: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let total = pending.len();
        Self {
            remaining: pending.into_iter().peekable(),
            materializer,
            gate,
            budget,
            processed: 0,
            total,
            active: Duration::ZERO,
            cancel,
            state: TaskState::Running,
            last_reading: None,
        }
    }
}

impl Task for GenerationTask {
    fn label(&self) -> &'static str {
        GENERATE_LABEL
    }

    fn resume(&mut self) {
        if self.state().is_terminal() {
            return;
        }
        if self.remaining.peek().is_none() {
            self.state = TaskState::Finished;
            return;
        }
        if !self.gate.allowed() {
            debug!("Generation paused by throttle");
            return;
        }

        let Self {
            remaining,
            materializer,
            budget,
            processed,
            cancel,
            ..
        } = self;

        // Only step past a cell once it materialized, so failures retry.
        let outcome = run_bounded::<MaterializeError, _>(*budget, cancel, || {
            let Some(&coord) = remaining.peek() else {
                return Ok(Step::Exhausted);
            };
            materializer.materialize(coord)?;
            remaining.next();
            *processed += 1;
            Ok(Step::Continue)
        });
        self.active += outcome.elapsed;

        match outcome.stop {
            StopReason::Cancelled => self.state = TaskState::Cancelled,
            StopReason::Failed(e) => warn!(error = %e, "Materialize failed, retrying next tick"),
            StopReason::Exhausted | StopReason::BudgetSpent => {}
        }

        if self.state == TaskState::Running && self.remaining.peek().is_none() {
            self.state = TaskState::Finished;
        }
    }

    fn cancel(&mut self) {
        self.cancel.cancel();
    }

    fn state(&self) -> TaskState {
        if self.state == TaskState::Running && self.cancel.is_cancelled() {
            TaskState::Cancelled
        } else {
            self.state
        }
    }

    fn progress(&mut self) -> ProgressReport {
        ProgressReport {
            label: GENERATE_LABEL,
            processed: self.processed,
            total: self.total,
            elapsed: self.active,
            throttle: Some(self.gate.reading()),
        }
    }

    fn log_progress(&mut self) {
        let report = self.progress();
        let reading = report.throttle;

        let log = should_log(self.last_reading, reading);
        self.last_reading = reading;
        if !log {
            return;
        }

        info!(
            task = report.label,
            processed = report.processed,
            total = report.total,
            "{}",
            report
        );
    }
}

/// False only for a repeated paused report whose balance has not moved.
fn should_log(last: Option<ThrottleReading>, now: Option<ThrottleReading>) -> bool {
    match (last, now) {
        (Some(last), Some(now)) => now.allowed || last.allowed || last.balance != now.balance,
        _ => true,
    }
}
