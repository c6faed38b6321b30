//! worldgen - resumable, throttled world generation over a grid region
//!
//! A run walks a rectangular region of grid cells in two phases:
//!
//! 1. **Inspect** - find the cells without a completion marker
//!    ([`inspect`], [`marker`]).
//! 2. **Generate** - materialize those cells in ascending order
//!    ([`generate`]), pausing while the host's burst credits are low
//!    ([`throttle`]).
//!
//! Pending cells are kept in a [`sparse::GridIndex`], which stores
//! contiguous runs rather than individual cells. All work is cooperative:
//! an external scheduler ticks an [`orchestrator::Orchestrator`] and every
//! tick runs one time-bounded slice ([`task`]).
//!
//! ```ignore
//! use worldgen::orchestrator::{Controller, OrchestratorConfig, RunRequest};
//!
//! let mut controller = Controller::new(database, strategy, OrchestratorConfig::default());
//! controller.start(request, materializer, gate)?;
//! while controller.tick().is_some() {
//!     std::thread::sleep(tick_interval);
//! }
//! ```

pub mod config;
pub mod coord;
pub mod generate;
pub mod inspect;
pub mod logging;
pub mod marker;
pub mod orchestrator;
pub mod sparse;
pub mod task;
pub mod throttle;

/// Version of the worldgen library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
