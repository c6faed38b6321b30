//! Inspection on a worker thread.
//!
//! Loading the bulk index and scanning a large region can take longer than
//! any sensible tick budget. Here a worker thread does the whole pass and
//! sends its result exactly once; ticks only wait for it, up to their
//! budget. The worker is not interruptible: cancelling stops the task from
//! waiting, but the thread still runs to completion and its result is
//! dropped.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{Inspection, INSPECT_LABEL};
use crate::coord::Region;
use crate::marker::{MarkerError, MarkerIndex};
use crate::sparse::GridIndex;
use crate::task::{ProgressReport, Task, TaskState};

/// Inspection whose scan runs on a dedicated thread.
pub struct BackgroundInspection {
    receiver: Receiver<Result<GridIndex, MarkerError>>,
    pending: GridIndex,
    budget: Duration,
    processed: u64,
    total: u64,
    started: Instant,
    cancel: CancellationToken,
    state: TaskState,
}

impl BackgroundInspection {
    /// Starts the worker thread for the markers in `dir`.
    pub fn spawn(
        dir: PathBuf,
        region: Region,
        budget: Duration,
        cancel: CancellationToken,
    ) -> Result<Self, MarkerError> {
        let total = region.area()?;
        let pending = GridIndex::new(region)?;
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("worldgen-inspect".to_string())
            .spawn(move || {
                let result = scan_index(&dir, region);
                // The receiver is gone if the run was dropped meanwhile.
                let _ = tx.send(result);
            })
            .map_err(MarkerError::Worker)?;

        Ok(Self {
            receiver: rx,
            pending,
            budget,
            processed: 0,
            total,
            started: Instant::now(),
            cancel,
            state: TaskState::Running,
        })
    }
}

/// Loads the index and collects every cell of `region` it does not list.
fn scan_index(dir: &Path, region: Region) -> Result<GridIndex, MarkerError> {
    let index = MarkerIndex::load(dir, region)?;
    let mut pending = GridIndex::new(region)?;
    for coord in region.cursor() {
        if !index.done().contains(coord) {
            pending.add(coord);
        }
    }
    Ok(pending)
}

impl Task for BackgroundInspection {
    fn label(&self) -> &'static str {
        INSPECT_LABEL
    }

    fn resume(&mut self) {
        if self.state().is_terminal() {
            return;
        }

        match self.receiver.recv_timeout(self.budget) {
            Ok(Ok(pending)) => {
                info!(
                    pending = pending.len(),
                    runs = pending.run_count(),
                    "Background inspection complete"
                );
                self.pending = pending;
                self.processed = self.total;
                self.state = TaskState::Finished;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Background inspection failed, nothing to generate");
                self.processed = self.total;
                self.state = TaskState::Finished;
            }
            Err(RecvTimeoutError::Timeout) => {
                debug!("Background inspection still running");
            }
            Err(RecvTimeoutError::Disconnected) => {
                error!("Background inspection worker exited without a result");
                self.processed = self.total;
                self.state = TaskState::Finished;
            }
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

impl Inspection for BackgroundInspection {
    fn into_pending(self: Box<Self>) -> GridIndex {
        self.pending
    }
}
