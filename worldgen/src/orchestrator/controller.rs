//! Start/stop command surface.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::{Orchestrator, OrchestratorConfig, OrchestratorError, Phase, RunStats};
use crate::coord::Region;
use crate::generate::Materializer;
use crate::marker::{Dimension, IndexLocation, MarkerStrategy};
use crate::task::ProgressReport;
use crate::throttle::GenerationGate;

/// Identifier handed out for each started run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Cells to inspect and generate.
    pub region: Region,
    /// Dataset version label, used to locate markers.
    pub version: String,
    /// Dimension, used to locate markers.
    pub dimension: Dimension,
}

/// Snapshot of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatus {
    pub id: RunId,
    pub region: Region,
    pub phase: Phase,
    /// Progress of the active task; `None` once the run has ended.
    pub progress: Option<ProgressReport>,
    /// Totals of completed phases.
    pub stats: RunStats,
}

/// Command errors.
#[derive(Debug, Error)]
pub enum ControlError {
    /// A run is already active.
    #[error("{0} is already running")]
    AlreadyRunning(RunId),

    /// No run is active.
    #[error("No run is active")]
    NotRunning,

    /// The run could not be constructed.
    #[error(transparent)]
    Start(#[from] OrchestratorError),
}

struct ActiveRun {
    id: RunId,
    orchestrator: Orchestrator,
}

impl ActiveRun {
    fn status(&mut self) -> RunStatus {
        RunStatus {
            id: self.id,
            region: self.orchestrator.region(),
            phase: self.orchestrator.phase(),
            progress: self.orchestrator.progress(),
            stats: self.orchestrator.stats().clone(),
        }
    }
}

/// Owns at most one run. Callers only ever see [`RunId`]s and
/// [`RunStatus`] snapshots.
pub struct Controller {
    database: PathBuf,
    strategy: MarkerStrategy,
    config: OrchestratorConfig,
    next_id: u64,
    active: Option<ActiveRun>,
}

impl Controller {
    pub fn new(database: impl Into<PathBuf>, strategy: MarkerStrategy, config: OrchestratorConfig) -> Self {
        Self {
            database: database.into(),
            strategy,
            config,
            next_id: 1,
            active: None,
        }
    }

    /// Root of the marker database.
    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a run. Fails without side effects if one is already active or
    /// the run cannot be constructed.
    pub fn start(
        &mut self,
        request: RunRequest,
        materializer: Box<dyn Materializer>,
        gate: Box<dyn GenerationGate>,
    ) -> Result<RunId, ControlError> {
        if let Some(run) = &self.active {
            return Err(ControlError::AlreadyRunning(run.id));
        }

        let location = IndexLocation::resolve(&self.database, &request.version, request.dimension)
            .map_err(OrchestratorError::from)?;
        let orchestrator = Orchestrator::for_region(
            self.strategy,
            &location,
            request.region,
            materializer,
            gate,
            self.config,
        )?;

        let id = RunId(self.next_id);
        self.next_id += 1;
        info!(
            run = %id,
            region = %request.region,
            version = %request.version,
            dimension = %request.dimension,
            "Run started"
        );
        self.active = Some(ActiveRun { id, orchestrator });
        Ok(id)
    }

    /// Cancels the active run.
    pub fn stop(&mut self) -> Result<RunId, ControlError> {
        let mut run = self.active.take().ok_or(ControlError::NotRunning)?;
        run.orchestrator.cancel();
        info!(run = %run.id, "Run stopped");
        Ok(run.id)
    }

    /// Advances the active run by one tick.
    ///
    /// Returns the run's status after the tick, or `None` if nothing is
    /// running. A run that ended during this tick is released.
    pub fn tick(&mut self) -> Option<RunStatus> {
        let run = self.active.as_mut()?;
        run.orchestrator.tick();
        let status = run.status();
        if status.phase.is_terminal() {
            info!(run = %status.id, phase = %status.phase, "Run ended");
            self.active = None;
        }
        Some(status)
    }

    /// Status of the active run without advancing it.
    pub fn status(&mut self) -> Option<RunStatus> {
        self.active.as_mut().map(ActiveRun::status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ChunkCoord;
    use crate::generate::MaterializeError;
    use crate::marker::MarkerError;
    use crate::throttle::AlwaysAllow;
    use std::time::Duration;
    use tempfile::TempDir;

    fn request(version: &str) -> RunRequest {
        RunRequest {
            region: Region::from_corners(ChunkCoord::new(0, 0), ChunkCoord::new(1, 1)),
            version: version.to_string(),
            dimension: Dimension::Overworld,
        }
    }

    fn noop() -> Box<dyn Materializer> {
        Box::new(|_: ChunkCoord| Ok::<(), MaterializeError>(()))
    }

    fn controller(temp: &TempDir) -> Controller {
        Controller::new(
            temp.path(),
            MarkerStrategy::Directory,
            OrchestratorConfig {
                work_budget: Duration::from_secs(1),
                log_interval: Duration::from_secs(60),
            },
        )
    }

    #[test]
    fn test_start_tick_to_completion() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller(&temp);

        let id = controller.start(request("1.0"), noop(), Box::new(AlwaysAllow)).unwrap();
        assert!(controller.is_running());
        assert_eq!(controller.status().unwrap().phase, Phase::Inspecting);

        let mut last = None;
        for _ in 0..10 {
            match controller.tick() {
                Some(status) => last = Some(status),
                None => break,
            }
        }
        let last = last.unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.phase, Phase::Finished);
        assert!(last.progress.is_none());
        assert_eq!(last.stats.inspected, 4);
        assert_eq!(last.stats.generated, 4);
        assert!(!controller.is_running());
        assert!(controller.tick().is_none());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller(&temp);

        let first = controller.start(request("1.0"), noop(), Box::new(AlwaysAllow)).unwrap();
        let err = controller
            .start(request("1.0"), noop(), Box::new(AlwaysAllow))
            .unwrap_err();
        assert!(matches!(err, ControlError::AlreadyRunning(id) if id == first));
    }

    #[test]
    fn test_stop() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller(&temp);
        assert!(matches!(controller.stop(), Err(ControlError::NotRunning)));

        let id = controller.start(request("1.0"), noop(), Box::new(AlwaysAllow)).unwrap();
        assert_eq!(controller.stop().unwrap(), id);
        assert!(!controller.is_running());

        let next = controller.start(request("1.0"), noop(), Box::new(AlwaysAllow)).unwrap();
        assert!(next > id);
    }

    #[test]
    fn test_invalid_version_fails_before_start() {
        let temp = TempDir::new().unwrap();
        let mut controller = controller(&temp);

        let err = controller
            .start(request("../escape"), noop(), Box::new(AlwaysAllow))
            .unwrap_err();
        assert!(matches!(
            err,
            ControlError::Start(OrchestratorError::Markers(MarkerError::InvalidVersion(_)))
        ));
        assert!(!controller.is_running());
    }
}
