//! Coordinate type definitions

use std::fmt;
use thiserror::Error;

/// Number of bits to shift a block coordinate right to get its cell.
///
/// A cell spans 16×16 blocks.
pub const BLOCKS_PER_CHUNK_SHIFT: u32 = 4;

/// A single grid cell.
///
/// Ordering is by `x` first, then `z`, which is the scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (slow-varying in scan order)
    pub x: i32,
    /// Z coordinate (fast-varying in scan order)
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a cell coordinate.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the cell containing the given block coordinates.
    ///
    /// Uses an arithmetic shift, so negative block coordinates floor
    /// towards negative infinity (block -1 is in cell -1).
    #[inline]
    pub const fn from_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> BLOCKS_PER_CHUNK_SHIFT,
            z: block_z >> BLOCKS_PER_CHUNK_SHIFT,
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// An inclusive rectangle of grid cells, `[min.x, max.x] × [min.z, max.z]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    min: ChunkCoord,
    max: ChunkCoord,
}

impl Region {
    /// Builds a region from two opposite corners in any order.
    pub fn from_corners(a: ChunkCoord, b: ChunkCoord) -> Self {
        Self {
            min: ChunkCoord::new(a.x.min(b.x), a.z.min(b.z)),
            max: ChunkCoord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Lowest corner (inclusive).
    #[inline]
    pub fn min(&self) -> ChunkCoord {
        self.min
    }

    /// Highest corner (inclusive).
    #[inline]
    pub fn max(&self) -> ChunkCoord {
        self.max
    }

    /// Number of cells along the x axis.
    #[inline]
    pub fn width(&self) -> u64 {
        (self.max.x as i64 - self.min.x as i64 + 1) as u64
    }

    /// Number of cells along the z axis.
    #[inline]
    pub fn depth(&self) -> u64 {
        (self.max.z as i64 - self.min.z as i64 + 1) as u64
    }

    /// Total number of cells.
    ///
    /// Fails only for regions spanning the entire `i32` range on both axes.
    pub fn area(&self) -> Result<u64, CoordError> {
        self.width()
            .checked_mul(self.depth())
            .ok_or(CoordError::RegionTooLarge {
                width: self.width(),
                depth: self.depth(),
            })
    }

    /// Returns true if the cell lies inside the rectangle.
    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.z..=self.max.z).contains(&coord.z)
    }

    /// Returns a cursor positioned at the first cell in scan order.
    pub fn cursor(&self) -> ScanCursor {
        ScanCursor::new(*self)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}

/// Position of a row-major walk over a [`Region`].
///
/// Starts at `min`, increments `z`; when `z` passes `max.z` it wraps back
/// to `min.z` and `x` is incremented. The walk is finished once `x` passes
/// `max.x`. Internally uses `i64` so the last step never overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    region: Region,
    x: i64,
    z: i64,
}

impl ScanCursor {
    fn new(region: Region) -> Self {
        Self {
            region,
            x: region.min.x as i64,
            z: region.min.z as i64,
        }
    }

    /// The region being walked.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns true once every cell has been visited.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.x > self.region.max.x as i64
    }

    /// The cell the cursor points at, without advancing.
    #[inline]
    pub fn peek(&self) -> Option<ChunkCoord> {
        if self.is_finished() {
            return None;
        }
        Some(ChunkCoord::new(self.x as i32, self.z as i32))
    }

    /// Moves to the next cell in scan order. No-op when finished.
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        self.z += 1;
        if self.z > self.region.max.z as i64 {
            self.z = self.region.min.z as i64;
            self.x += 1;
        }
    }
}

impl Iterator for ScanCursor {
    type Item = ChunkCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.peek()?;
        self.advance();
        Some(current)
    }
}

/// Errors produced by coordinate and region arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// A cell lies outside the region it was checked against.
    #[error("Cell {coord} is outside region {region}")]
    OutOfRegion { coord: ChunkCoord, region: Region },

    /// The region's cell count does not fit in 64 bits.
    #[error("Region of {width}×{depth} cells is too large to index")]
    RegionTooLarge { width: u64, depth: u64 },
}
