//! Per-cell marker files.

use std::path::{Path, PathBuf};

use super::{MarkerError, MarkerSource};
use crate::coord::ChunkCoord;

/// Marker state stored as one `c.{x}.{z}.idx` file per finished cell.
#[derive(Debug, Clone)]
pub struct MarkerDirectory {
    dir: PathBuf,
}

impl MarkerDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the marker file for a cell.
    pub fn marker_path(&self, coord: ChunkCoord) -> PathBuf {
        self.dir.join(format!("c.{}.{}.idx", coord.x, coord.z))
    }
}

impl MarkerSource for MarkerDirectory {
    fn is_done(&self, coord: ChunkCoord) -> Result<bool, MarkerError> {
        let path = self.marker_path(coord);
        path.try_exists()
            .map_err(|source| MarkerError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_marker_file_name() {
        let markers = MarkerDirectory::new("/db/v1/0");
        assert_eq!(
            markers.marker_path(ChunkCoord::new(-3, 12)),
            Path::new("/db/v1/0/c.-3.12.idx")
        );
    }

    #[test]
    fn test_presence_means_done() {
        let temp = tempfile::TempDir::new().unwrap();
        let markers = MarkerDirectory::new(temp.path());
        fs::write(markers.marker_path(ChunkCoord::new(1, 0)), b"").unwrap();

        assert!(markers.is_done(ChunkCoord::new(1, 0)).unwrap());
        assert!(!markers.is_done(ChunkCoord::new(0, 1)).unwrap());
    }

    #[test]
    fn test_missing_directory_means_nothing_done() {
        let temp = tempfile::TempDir::new().unwrap();
        let markers = MarkerDirectory::new(temp.path().join("not-created"));
        assert!(!markers.is_done(ChunkCoord::new(0, 0)).unwrap());
    }
}
