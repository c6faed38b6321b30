//! Inspection: finding the cells of a region that still need work.
//!
//! Inspection walks the region in scan order, asks a [`MarkerSource`]
//! whether each cell is done, and records the rest in a [`GridIndex`].
//! That index is then handed to generation through
//! [`Inspection::into_pending`].
//!
//! [`MarkerSource`]: crate::marker::MarkerSource

mod background;
mod scan;

pub use background::BackgroundInspection;
pub use scan::InspectionTask;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::coord::Region;
use crate::marker::{IndexLocation, MarkerDirectory, MarkerError, MarkerIndex, MarkerStrategy};
use crate::sparse::GridIndex;
use crate::task::Task;

/// Label used in progress lines.
pub const INSPECT_LABEL: &str = "inspect";

/// A task that produces the set of pending cells.
pub trait Inspection: Task {
    /// Consumes the task, yielding the cells that still need work.
    ///
    /// Only meaningful once the task has finished; a cancelled or
    /// unfinished inspection yields whatever it found so far.
    fn into_pending(self: Box<Self>) -> GridIndex;
}

/// Starts inspecting `region` against the markers at `location`.
///
/// Failures here (bad region, unreadable index, worker spawn) happen before
/// any task exists.
pub fn start_inspection(
    strategy: MarkerStrategy,
    location: &IndexLocation,
    region: Region,
    budget: Duration,
    cancel: CancellationToken,
) -> Result<Box<dyn Inspection>, MarkerError> {
    info!(%strategy, dir = %location.dir().display(), %region, "Starting inspection");

    let task: Box<dyn Inspection> = match strategy {
        MarkerStrategy::Directory => Box::new(InspectionTask::new(
            Box::new(MarkerDirectory::new(location.dir())),
            region,
            budget,
            cancel,
        )?),
        MarkerStrategy::Index => Box::new(InspectionTask::new(
            Box::new(MarkerIndex::load(location.dir(), region)?),
            region,
            budget,
            cancel,
        )?),
        MarkerStrategy::BackgroundIndex => Box::new(BackgroundInspection::spawn(
            location.dir().to_path_buf(),
            region,
            budget,
            cancel,
        )?),
    };
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ChunkCoord;
    use crate::marker::INDEX_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    fn region() -> Region {
        Region::from_corners(ChunkCoord::new(0, 0), ChunkCoord::new(2, 1))
    }

    fn run_to_end(mut task: Box<dyn Inspection>) -> Vec<ChunkCoord> {
        for _ in 0..1000 {
            if task.is_finished() {
                break;
            }
            task.resume();
        }
        assert!(task.is_finished());
        task.into_pending().iter().collect()
    }

    #[test]
    fn test_all_strategies_agree() {
        let temp = TempDir::new().unwrap();
        let location = IndexLocation::from_dir(temp.path());
        fs::write(temp.path().join("c.1.0.idx"), b"").unwrap();
        fs::write(temp.path().join("c.2.1.idx"), b"").unwrap();
        fs::write(temp.path().join(INDEX_FILE_NAME), "1\t0\n2\t1\n").unwrap();

        let expected = vec![
            ChunkCoord::new(0, 0),
            ChunkCoord::new(0, 1),
            ChunkCoord::new(1, 1),
            ChunkCoord::new(2, 0),
        ];

        for strategy in [
            MarkerStrategy::Directory,
            MarkerStrategy::Index,
            MarkerStrategy::BackgroundIndex,
        ] {
            let task = start_inspection(
                strategy,
                &location,
                region(),
                Duration::from_millis(100),
                CancellationToken::new(),
            )
            .unwrap();
            assert_eq!(run_to_end(task), expected, "strategy {}", strategy);
        }
    }

    #[test]
    fn test_missing_directory_means_everything_pending() {
        let temp = TempDir::new().unwrap();
        let location = IndexLocation::from_dir(temp.path().join("absent"));

        for strategy in [MarkerStrategy::Directory, MarkerStrategy::Index] {
            let task = start_inspection(
                strategy,
                &location,
                region(),
                Duration::from_millis(100),
                CancellationToken::new(),
            )
            .unwrap();
            assert_eq!(run_to_end(task).len(), 6);
        }
    }
}
