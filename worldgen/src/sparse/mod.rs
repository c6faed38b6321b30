//! Sparse sets for tracking which cells of a large region are pending.
//!
//! Regions can hold millions of cells, but the cells still to be generated
//! tend to form long contiguous runs. [`IntervalSet`] stores integers as
//! sorted, disjoint, non-adjacent closed intervals, so memory grows with
//! the number of runs rather than the number of cells. [`GridIndex`] maps
//! a [`Region`](crate::coord::Region) onto that set.
//!
//! # Example
//!
//! ```
//! use worldgen::coord::{ChunkCoord, Region};
//! use worldgen::sparse::GridIndex;
//!
//! let region = Region::from_corners(ChunkCoord::new(0, 0), ChunkCoord::new(2, 1));
//! let mut pending = GridIndex::new(region).unwrap();
//!
//! pending.add(ChunkCoord::new(2, 0));
//! pending.add(ChunkCoord::new(0, 1));
//! pending.add(ChunkCoord::new(0, 0));
//!
//! let order: Vec<_> = pending.iter().collect();
//! assert_eq!(
//!     order,
//!     vec![ChunkCoord::new(0, 0), ChunkCoord::new(0, 1), ChunkCoord::new(2, 0)]
//! );
//! ```

mod grid_index;
mod interval_set;

pub use grid_index::{Coords, GridIndex, IntoCoords};
pub use interval_set::{Interval, IntervalSet, IntoIter, Iter};
