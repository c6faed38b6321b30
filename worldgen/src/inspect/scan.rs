//! Incremental inspection driven by ticks.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Inspection, INSPECT_LABEL};
use crate::coord::{CoordError, Region, ScanCursor};
use crate::marker::{MarkerError, MarkerSource};
use crate::sparse::GridIndex;
use crate::task::{run_bounded, ProgressReport, Step, StopReason, Task, TaskState};

/// Walks the region a budget's worth of cells per tick.
pub struct InspectionTask {
    markers: Box<dyn MarkerSource>,
    cursor: ScanCursor,
    pending: GridIndex,
    budget: Duration,
    processed: u64,
    total: u64,
    started: Instant,
    cancel: CancellationToken,
    state: TaskState,
}

impl InspectionTask {
    pub fn new(
        markers: Box<dyn MarkerSource>,
        region: Region,
        budget: Duration,
        cancel: CancellationToken,
    ) -> Result<Self, CoordError> {
        Ok(Self {
            markers,
            cursor: region.cursor(),
            pending: GridIndex::new(region)?,
            budget,
            processed: 0,
            total: region.area()?,
            started: Instant::now(),
            cancel,
            state: TaskState::Running,
        })
    }

    /// Cells found so far that still need work.
    pub fn pending(&self) -> &GridIndex {
        &self.pending
    }
}

impl Task for InspectionTask {
    fn label(&self) -> &'static str {
        INSPECT_LABEL
    }

    fn resume(&mut self) {
        if self.state().is_terminal() {
            return;
        }

        let Self {
            markers,
            cursor,
            pending,
            budget,
            processed,
            cancel,
            ..
        } = self;

        // The cursor only moves once the lookup succeeded, so a failing cell
        // is retried on the next tick.
        let outcome = run_bounded::<MarkerError, _>(*budget, cancel, || {
            let Some(coord) = cursor.peek() else {
                return Ok(Step::Exhausted);
            };
            if !markers.is_done(coord)? {
                pending.add(coord);
            }
            cursor.advance();
            *processed += 1;
            Ok(Step::Continue)
        });

        debug!(units = outcome.units, elapsed_ms = outcome.elapsed.as_millis() as u64, "Inspection slice");

        match outcome.stop {
            StopReason::Cancelled => self.state = TaskState::Cancelled,
            StopReason::Failed(e) => {
                warn!(at = ?self.cursor.peek(), error = %e, "Marker lookup failed, retrying next tick");
            }
            StopReason::Exhausted | StopReason::BudgetSpent => {}
        }

        if self.state == TaskState::Running && self.cursor.is_finished() {
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
            label: INSPECT_LABEL,
            processed: self.processed,
            total: self.total,
            elapsed: self.started.elapsed(),
            throttle: None,
        }
    }
}

impl Inspection for InspectionTask {
    fn into_pending(self: Box<Self>) -> GridIndex {
        self.pending
    }
}
