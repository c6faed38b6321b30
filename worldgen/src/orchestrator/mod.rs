//! Run orchestration.
//!
//! An [`Orchestrator`] owns one run over a region: it inspects first, then
//! hands the pending cells to generation. It does no work on its own; a
//! scheduler calls [`Orchestrator::tick`] at a roughly fixed cadence and
//! each tick runs one bounded slice of the active task.
//!
//! ```text
//! Inspecting --[inspection finished]--> Generating --[generation finished]--> Finished
//!      \                                     |
//!       `--------------[cancel()]------------+-------------------------------> Cancelled
//! ```
//!
//! The [`Controller`] sits in front of it as the start/stop command surface
//! and allows at most one run at a time.

mod controller;
mod run;
mod stats;

pub use controller::{ControlError, Controller, RunId, RunRequest, RunStatus};
pub use run::{Orchestrator, OrchestratorConfig, Phase, DEFAULT_LOG_INTERVAL, DEFAULT_WORK_BUDGET};
pub use stats::RunStats;

use thiserror::Error;

use crate::marker::MarkerError;

/// Errors constructing a run. Nothing is started when these occur.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Marker state could not be located or opened.
    #[error("Cannot start run: {0}")]
    Markers(#[from] MarkerError),
}
