//! Sparse set of cells within a fixed region.

use std::ops::ControlFlow;

use super::interval_set::{IntervalSet, IntoIter, Iter};
use crate::coord::{ChunkCoord, CoordError, Region};

/// A set of cells inside a [`Region`], backed by an [`IntervalSet`].
///
/// Cells are linearised x-major:
///
/// ```text
/// index = (z - min.z) + (x - min.x) * depth
/// ```
///
/// so ascending index order is exactly the [`ScanCursor`](crate::coord::ScanCursor)
/// order (by `x`, then `z`).
///
/// Cells outside the region are rejected: [`add`](Self::add) is a no-op
/// returning `false`, [`contains`](Self::contains) returns `false`, and
/// [`try_index`](Self::try_index) reports [`CoordError::OutOfRegion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridIndex {
    region: Region,
    layout: Layout,
    cells: IntervalSet,
}

impl GridIndex {
    /// Creates an empty index over `region`.
    ///
    /// Fails if the region has more cells than a `u64` index can address.
    pub fn new(region: Region) -> Result<Self, CoordError> {
        let area = region.area()?;
        Ok(Self {
            region,
            layout: Layout {
                min: region.min(),
                depth: region.depth(),
                area,
            },
            cells: IntervalSet::new(),
        })
    }

    /// The region this index covers.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Linear index of a cell.
    pub fn try_index(&self, coord: ChunkCoord) -> Result<u64, CoordError> {
        if !self.region.contains(coord) {
            return Err(CoordError::OutOfRegion {
                coord,
                region: self.region,
            });
        }
        let min = self.layout.min;
        let dx = (coord.x as i64 - min.x as i64) as u64;
        let dz = (coord.z as i64 - min.z as i64) as u64;
        Ok(dz + dx * self.layout.depth)
    }

    /// Cell for a linear index. `None` if the index is past the region.
    pub fn coord_at(&self, index: u64) -> Option<ChunkCoord> {
        self.layout.coord_at(index)
    }

    /// Adds a cell. Returns `false` if it was present or out of region.
    pub fn add(&mut self, coord: ChunkCoord) -> bool {
        match self.try_index(coord) {
            Ok(index) => self.cells.add(index),
            Err(_) => false,
        }
    }

    /// Returns true if the cell is in the set.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.try_index(coord)
            .is_ok_and(|index| self.cells.contains(index))
    }

    /// Number of cells in the set.
    pub fn len(&self) -> u64 {
        self.cells.len()
    }

    /// Returns true if no cell has been added.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of contiguous runs backing the set.
    pub fn run_count(&self) -> usize {
        self.cells.intervals().len()
    }

    /// The underlying linear set.
    pub fn cells(&self) -> &IntervalSet {
        &self.cells
    }

    /// Cells in ascending scan order.
    pub fn iter(&self) -> Coords<'_> {
        Coords {
            layout: self.layout,
            inner: self.cells.iter(),
        }
    }

    /// Visits cells in ascending order until `visit` breaks.
    ///
    /// Returns `true` if every cell was visited.
    pub fn for_each<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(ChunkCoord) -> ControlFlow<()>,
    {
        self.iter().try_for_each(&mut visit).is_continue()
    }
}

/// Region geometry needed to turn a linear index back into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    min: ChunkCoord,
    depth: u64,
    area: u64,
}

impl Layout {
    fn coord_at(&self, index: u64) -> Option<ChunkCoord> {
        if index >= self.area {
            return None;
        }
        let dx = (index / self.depth) as i64;
        let dz = (index % self.depth) as i64;
        Some(ChunkCoord::new(
            (self.min.x as i64 + dx) as i32,
            (self.min.z as i64 + dz) as i32,
        ))
    }
}

/// Borrowing iterator over a [`GridIndex`] in scan order.
#[derive(Debug, Clone)]
pub struct Coords<'a> {
    layout: Layout,
    inner: Iter<'a>,
}

impl Iterator for Coords<'_> {
    type Item = ChunkCoord;

    fn next(&mut self) -> Option<ChunkCoord> {
        let index = self.inner.next()?;
        self.layout.coord_at(index)
    }
}

/// Owning iterator over a [`GridIndex`] in scan order.
///
/// Used by generation, which consumes the pending set exactly once.
#[derive(Debug, Clone)]
pub struct IntoCoords {
    layout: Layout,
    inner: IntoIter,
}

impl Iterator for IntoCoords {
    type Item = ChunkCoord;

    fn next(&mut self) -> Option<ChunkCoord> {
        let index = self.inner.next()?;
        self.layout.coord_at(index)
    }
}

impl IntoIterator for GridIndex {
    type Item = ChunkCoord;
    type IntoIter = IntoCoords;

    fn into_iter(self) -> IntoCoords {
        IntoCoords {
            layout: self.layout,
            inner: self.cells.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a GridIndex {
    type Item = ChunkCoord;
    type IntoIter = Coords<'a>;

    fn into_iter(self) -> Coords<'a> {
        self.iter()
    }
}
