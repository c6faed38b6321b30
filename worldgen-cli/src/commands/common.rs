//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use worldgen::config::ConfigFile;
use worldgen::coord::{ChunkCoord, Region};
use worldgen::marker::{Dimension, IndexLocation, MarkerStrategy};
use worldgen::orchestrator::RunRequest;

use crate::error::CliError;

/// Marker strategy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StrategyArg {
    /// Check one c.<x>.<z>.idx marker file per cell
    Directory,
    /// Load index.txt once and scan a slice per tick
    Index,
    /// Load and scan index.txt on a worker thread
    Background,
}

impl From<StrategyArg> for MarkerStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Directory => MarkerStrategy::Directory,
            StrategyArg::Index => MarkerStrategy::Index,
            StrategyArg::Background => MarkerStrategy::BackgroundIndex,
        }
    }
}

/// Region and dataset selection shared by `run` and `inspect`.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// X of the first corner
    #[arg(allow_negative_numbers = true)]
    pub x0: i32,

    /// Z of the first corner
    #[arg(allow_negative_numbers = true)]
    pub z0: i32,

    /// X of the opposite corner
    #[arg(allow_negative_numbers = true)]
    pub x1: i32,

    /// Z of the opposite corner
    #[arg(allow_negative_numbers = true)]
    pub z1: i32,

    /// Dataset version label, used to locate markers
    pub version: String,

    /// Dimension (overworld, nether or end)
    #[arg(long, default_value = "overworld")]
    pub dimension: Dimension,

    /// Treat corners as cell coordinates instead of block coordinates
    #[arg(long)]
    pub chunks: bool,

    /// Marker strategy (overrides [markers] strategy)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Marker database root (overrides [markers] database)
    #[arg(long, value_name = "DIR")]
    pub database: Option<PathBuf>,
}

impl TargetArgs {
    /// The cell region covered by the two corners.
    ///
    /// Block coordinates are converted to the cells containing them.
    pub fn region(&self) -> Region {
        let (a, b) = if self.chunks {
            (ChunkCoord::new(self.x0, self.z0), ChunkCoord::new(self.x1, self.z1))
        } else {
            (
                ChunkCoord::from_block(self.x0, self.z0),
                ChunkCoord::from_block(self.x1, self.z1),
            )
        };
        Region::from_corners(a, b)
    }

    pub fn database(&self, config: &ConfigFile) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| config.markers.database.clone())
    }

    pub fn strategy(&self, config: &ConfigFile) -> MarkerStrategy {
        self.strategy
            .map(MarkerStrategy::from)
            .unwrap_or(config.markers.strategy)
    }

    /// Marker directory for the selected version and dimension.
    pub fn location(&self, config: &ConfigFile) -> Result<IndexLocation, CliError> {
        Ok(IndexLocation::resolve(
            &self.database(config),
            &self.version,
            self.dimension,
        )?)
    }

    pub fn request(&self) -> RunRequest {
        RunRequest {
            region: self.region(),
            version: self.version.clone(),
            dimension: self.dimension,
        }
    }
}
