//! Generation: materializing every pending cell.
//!
//! [`GenerationTask`] consumes the [`GridIndex`](crate::sparse::GridIndex)
//! produced by inspection in ascending order and hands each cell to a
//! [`Materializer`], gated once per tick by a
//! [`GenerationGate`](crate::throttle::GenerationGate).

mod command;
mod task;

pub use command::CommandMaterializer;
pub use task::{GenerationTask, GENERATE_LABEL};

use std::io;

use thiserror::Error;

use crate::coord::ChunkCoord;

/// Performs the expensive work for one cell.
///
/// Implementations must be idempotent: a cell whose call failed is handed
/// over again on the next tick.
pub trait Materializer: Send {
    fn materialize(&mut self, coord: ChunkCoord) -> Result<(), MaterializeError>;
}

impl<F> Materializer for F
where
    F: FnMut(ChunkCoord) -> Result<(), MaterializeError> + Send,
{
    fn materialize(&mut self, coord: ChunkCoord) -> Result<(), MaterializeError> {
        self(coord)
    }
}

/// Errors materializing a cell.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The external program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The external program exited unsuccessfully.
    #[error("Generating {coord} failed with {status}")]
    ExitStatus { coord: ChunkCoord, status: String },

    /// Any other failure.
    #[error("Generating {coord} failed: {reason}")]
    Failed { coord: ChunkCoord, reason: String },
}
