//! The per-run state machine.

use std::fmt;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{OrchestratorError, RunStats};
use crate::coord::Region;
use crate::generate::{GenerationTask, Materializer};
use crate::inspect::{start_inspection, Inspection};
use crate::marker::{IndexLocation, MarkerStrategy};
use crate::task::{ProgressReport, Task, TaskState};
use crate::throttle::GenerationGate;

/// Default time budget of one tick's slice of work.
pub const DEFAULT_WORK_BUDGET: Duration = Duration::from_millis(250);

/// Default minimum time between progress lines.
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Run pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Time budget handed to each task slice.
    pub work_budget: Duration,
    /// Minimum time between progress lines.
    pub log_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            work_budget: DEFAULT_WORK_BUDGET,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

/// Phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inspecting,
    Generating,
    Finished,
    Cancelled,
}

impl Phase {
    /// Returns true for `Finished` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished | Phase::Cancelled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Inspecting => "inspecting",
            Phase::Generating => "generating",
            Phase::Finished => "finished",
            Phase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// The task currently owned by a run.
///
/// Generation collaborators ride along with the inspection until they are
/// moved into the generation task.
enum ActiveTask {
    Inspecting {
        task: Box<dyn Inspection>,
        materializer: Box<dyn Materializer>,
        gate: Box<dyn GenerationGate>,
    },
    Generating(GenerationTask),
}

/// Drives one run from inspection to the end of generation.
pub struct Orchestrator {
    config: OrchestratorConfig,
    region: Region,
    active: Option<ActiveTask>,
    phase: Phase,
    cancel: CancellationToken,
    last_log: Instant,
    stats: RunStats,
}

impl Orchestrator {
    /// Starts a run on an already constructed inspection.
    ///
    /// `cancel` should be the parent of the token the inspection was given.
    pub fn new(
        region: Region,
        inspection: Box<dyn Inspection>,
        materializer: Box<dyn Materializer>,
        gate: Box<dyn GenerationGate>,
        config: OrchestratorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            region,
            active: Some(ActiveTask::Inspecting {
                task: inspection,
                materializer,
                gate,
            }),
            phase: Phase::Inspecting,
            cancel,
            last_log: Instant::now(),
            stats: RunStats::default(),
        }
    }

    /// Starts a run over `region` with markers read from `location`.
    pub fn for_region(
        strategy: MarkerStrategy,
        location: &IndexLocation,
        region: Region,
        materializer: Box<dyn Materializer>,
        gate: Box<dyn GenerationGate>,
        config: OrchestratorConfig,
    ) -> Result<Self, OrchestratorError> {
        let cancel = CancellationToken::new();
        let inspection = start_inspection(
            strategy,
            location,
            region,
            config.work_budget,
            cancel.child_token(),
        )?;
        Ok(Self::new(region, inspection, materializer, gate, config, cancel))
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true once the run is `Finished` or `Cancelled`.
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Totals of completed phases.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Progress of the active task, if any.
    pub fn progress(&mut self) -> Option<ProgressReport> {
        match self.active.as_mut()? {
            ActiveTask::Inspecting { task, .. } => Some(task.progress()),
            ActiveTask::Generating(task) => Some(task.progress()),
        }
    }

    /// Runs one slice of the active task.
    pub fn tick(&mut self) {
        let log_due = self.last_log.elapsed() >= self.config.log_interval;
        let finished = match self.active.as_mut() {
            Some(ActiveTask::Inspecting { task, .. }) => drive(task.as_mut(), log_due),
            Some(ActiveTask::Generating(task)) => drive(task, log_due),
            None => return,
        };
        if log_due {
            self.last_log = Instant::now();
        }
        if finished {
            self.advance();
        }
    }

    /// Cancels the active task and drops it. A cancelled run never resumes.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        let Some(active) = self.active.take() else {
            return;
        };

        match active {
            ActiveTask::Inspecting { mut task, .. } => {
                task.cancel();
                task.log_progress();
            }
            ActiveTask::Generating(mut task) => {
                task.cancel();
                task.log_progress();
                self.stats.record_generation(&task.progress());
            }
        }
        self.phase = Phase::Cancelled;
        info!(region = %self.region, stats = %self.stats, "Run cancelled");
    }

    /// Moves to the next phase after the active task finished.
    fn advance(&mut self) {
        match self.active.take() {
            Some(ActiveTask::Inspecting {
                mut task,
                materializer,
                gate,
            }) => {
                task.log_progress();
                self.stats.record_inspection(&task.progress());
                if task.state() == TaskState::Cancelled {
                    self.phase = Phase::Cancelled;
                    return;
                }

                let pending = task.into_pending();
                self.stats.pending = pending.len();
                info!(
                    pending = pending.len(),
                    runs = pending.run_count(),
                    "Inspection finished, starting generation"
                );

                let generation = GenerationTask::new(
                    pending,
                    materializer,
                    gate,
                    self.config.work_budget,
                    self.cancel.child_token(),
                );
                self.active = Some(ActiveTask::Generating(generation));
                self.phase = Phase::Generating;
            }
            Some(ActiveTask::Generating(mut task)) => {
                task.log_progress();
                self.stats.record_generation(&task.progress());
                self.phase = match task.state() {
                    TaskState::Cancelled => Phase::Cancelled,
                    _ => Phase::Finished,
                };
                info!(region = %self.region, stats = %self.stats, "Run {}", self.phase);
            }
            None => {}
        }
    }
}

/// Resumes a task and reports whether it is done.
fn drive<T: Task + ?Sized>(task: &mut T, log_due: bool) -> bool {
    task.resume();
    if log_due {
        task.log_progress();
    }
    task.is_finished()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ChunkCoord;
    use crate::inspect::InspectionTask;
    use crate::marker::MarkerIndex;
    use crate::throttle::AlwaysAllow;
    use std::sync::{Arc, Mutex};

    fn region() -> Region {
        Region::from_corners(ChunkCoord::new(0, 0), ChunkCoord::new(2, 1))
    }

    fn orchestrator(budget: Duration) -> (Orchestrator, Arc<Mutex<Vec<ChunkCoord>>>) {
        let markers = MarkerIndex::from_reader("1\t0\n2\t1\n".as_bytes(), region()).unwrap();
        let cancel = CancellationToken::new();
        let inspection =
            InspectionTask::new(Box::new(markers), region(), budget, cancel.child_token()).unwrap();

        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let materializer = move |coord: ChunkCoord| {
            sink.lock().unwrap().push(coord);
            Ok::<(), crate::generate::MaterializeError>(())
        };

        let config = OrchestratorConfig {
            work_budget: budget,
            log_interval: Duration::ZERO,
        };
        let orchestrator = Orchestrator::new(
            region(),
            Box::new(inspection),
            Box::new(materializer),
            Box::new(AlwaysAllow),
            config,
            cancel,
        );
        (orchestrator, calls)
    }

    #[test]
    fn test_runs_through_all_phases() {
        let (mut run, calls) = orchestrator(Duration::from_secs(1));
        assert_eq!(run.phase(), Phase::Inspecting);

        run.tick();
        assert_eq!(run.phase(), Phase::Generating);
        assert_eq!(run.stats().pending, 4);

        run.tick();
        assert_eq!(run.phase(), Phase::Finished);
        assert!(run.is_finished());
        assert!(run.progress().is_none());

        assert_eq!(calls.lock().unwrap().len(), 4);
        assert_eq!(run.stats().inspected, 6);
        assert_eq!(run.stats().generated, 4);
    }

    #[test]
    fn test_cancel_during_generation() {
        let (mut run, calls) = orchestrator(Duration::ZERO);
        while run.phase() == Phase::Inspecting {
            run.tick();
        }
        run.tick();
        assert_eq!(calls.lock().unwrap().len(), 1);

        run.cancel();
        assert_eq!(run.phase(), Phase::Cancelled);
        run.tick();
        run.tick();
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(run.stats().generated, 1);
    }

    #[test]
    fn test_cancel_during_inspection() {
        let (mut run, calls) = orchestrator(Duration::ZERO);
        run.tick();
        run.cancel();
        assert_eq!(run.phase(), Phase::Cancelled);
        run.tick();
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tick_after_finish_is_noop() {
        let (mut run, calls) = orchestrator(Duration::from_secs(1));
        for _ in 0..5 {
            run.tick();
        }
        assert_eq!(run.phase(), Phase::Finished);
        assert_eq!(calls.lock().unwrap().len(), 4);
    }
}
