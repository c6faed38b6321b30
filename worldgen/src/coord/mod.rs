//! Grid cell coordinates and rectangular regions.
//!
//! A run covers a rectangle of grid cells (chunks). Cells are addressed by
//! integer `(x, z)` pairs; the rectangle is walked in one canonical order,
//! ascending by `x` and then by `z`, which both the inspector and the
//! generator rely on.
//!
//! ```
//! use worldgen::coord::{ChunkCoord, Region};
//!
//! let region = Region::from_corners(ChunkCoord::new(2, 1), ChunkCoord::new(0, 0));
//! let order: Vec<_> = region.cursor().collect();
//!
//! assert_eq!(order.len(), 6);
//! assert_eq!(order[0], ChunkCoord::new(0, 0));
//! assert_eq!(order[1], ChunkCoord::new(0, 1));
//! assert_eq!(order[5], ChunkCoord::new(2, 1));
//! ```

mod types;

pub use types::{ChunkCoord, CoordError, Region, ScanCursor, BLOCKS_PER_CHUNK_SHIFT};

#[cfg(test)]
mod tests;
