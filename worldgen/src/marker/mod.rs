//! Completion markers: the "is this cell already done?" predicate.
//!
//! A run never writes markers itself. Some external exporter records each
//! finished cell, and inspection only reads that state. Two on-disk layouts
//! are supported:
//!
//! - [`MarkerDirectory`] - one `c.{x}.{z}.idx` file per finished cell,
//!   checked on every lookup.
//! - [`MarkerIndex`] - a single `index.txt` of `x<TAB>z` lines, loaded once
//!   and consulted in memory.
//!
//! Both answer identically for the same marker state.
//!
//! Marker files for a dataset live under
//! `{database}/{version}/{dimension id}` (see [`IndexLocation`]).

mod directory;
mod index;
mod location;

pub use directory::MarkerDirectory;
pub use index::{IndexLoadStats, MarkerIndex, INDEX_FILE_NAME};
pub use location::{Dimension, IndexLocation};

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::{ChunkCoord, CoordError};

/// Answers whether a cell's work has already been done.
pub trait MarkerSource: Send {
    /// Returns true if a marker exists for `coord`.
    fn is_done(&self, coord: ChunkCoord) -> Result<bool, MarkerError>;
}

impl<M: MarkerSource + ?Sized> MarkerSource for Box<M> {
    fn is_done(&self, coord: ChunkCoord) -> Result<bool, MarkerError> {
        (**self).is_done(coord)
    }
}

/// How inspection obtains marker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStrategy {
    /// Stat one marker file per cell, incrementally across ticks.
    Directory,
    /// Load `index.txt` once, then scan incrementally across ticks.
    Index,
    /// Load `index.txt` and scan on a worker thread; ticks only wait.
    #[default]
    BackgroundIndex,
}

impl fmt::Display for MarkerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerStrategy::Directory => "directory",
            MarkerStrategy::Index => "index",
            MarkerStrategy::BackgroundIndex => "background",
        };
        f.write_str(name)
    }
}

impl FromStr for MarkerStrategy {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "directory" | "files" => Ok(MarkerStrategy::Directory),
            "index" => Ok(MarkerStrategy::Index),
            "background" | "background-index" => Ok(MarkerStrategy::BackgroundIndex),
            other => Err(MarkerError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Errors reading marker state.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// Filesystem access failed.
    #[error("Failed to read marker state at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dimension name does not map to a known dimension id.
    #[error("Unknown dimension '{0}' (expected overworld, nether or end)")]
    UnknownDimension(String),

    /// The dataset version label cannot be used as a directory name.
    #[error("Invalid dataset version '{0}'")]
    InvalidVersion(String),

    /// The marker strategy name is not recognised.
    #[error("Unknown marker strategy '{0}' (expected directory, index or background)")]
    UnknownStrategy(String),

    /// The background scan thread could not be started.
    #[error("Failed to start marker scan worker: {0}")]
    Worker(#[source] io::Error),

    /// The region cannot be indexed.
    #[error(transparent)]
    Region(#[from] CoordError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips_through_display() {
        for strategy in [
            MarkerStrategy::Directory,
            MarkerStrategy::Index,
            MarkerStrategy::BackgroundIndex,
        ] {
            assert_eq!(strategy.to_string().parse::<MarkerStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_strategy_parse_is_case_insensitive() {
        assert_eq!(
            " Directory ".parse::<MarkerStrategy>().unwrap(),
            MarkerStrategy::Directory
        );
        assert!(matches!(
            "sqlite".parse::<MarkerStrategy>(),
            Err(MarkerError::UnknownStrategy(_))
        ));
    }
}
