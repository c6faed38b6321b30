//! Bulk marker index (`index.txt`).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use super::{MarkerError, MarkerSource};
use crate::coord::{ChunkCoord, Region};
use crate::sparse::GridIndex;

/// File name of the bulk index inside a marker directory.
pub const INDEX_FILE_NAME: &str = "index.txt";

/// Counters from loading an index file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexLoadStats {
    /// Lines read from the file.
    pub lines: u64,
    /// Lines naming a cell inside the region.
    pub in_region: u64,
    /// Lines that could not be parsed.
    pub malformed: u64,
}

/// Finished cells listed in a single `x<TAB>z` per line file.
///
/// Only cells inside the run's region are kept, in a [`GridIndex`], so
/// memory stays proportional to the number of contiguous runs.
#[derive(Debug, Clone)]
pub struct MarkerIndex {
    done: GridIndex,
    stats: IndexLoadStats,
}

impl MarkerIndex {
    /// An index with nothing marked.
    pub fn empty(region: Region) -> Result<Self, MarkerError> {
        Ok(Self {
            done: GridIndex::new(region)?,
            stats: IndexLoadStats::default(),
        })
    }

    /// Loads `index.txt` from a marker directory.
    ///
    /// A missing file means nothing has been marked yet.
    pub fn load(dir: &Path, region: Region) -> Result<Self, MarkerError> {
        let path = dir.join(INDEX_FILE_NAME);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No marker index found, treating region as untouched");
                return Self::empty(region);
            }
            Err(source) => return Err(MarkerError::Io { path, source }),
        };

        info!(path = %path.display(), "Reading marker index");
        let index = Self::from_reader(BufReader::new(file), region)
            .map_err(|e| match e {
                MarkerError::Io { source, .. } => MarkerError::Io {
                    path: path.clone(),
                    source,
                },
                other => other,
            })?;
        info!(
            lines = index.stats.lines,
            in_region = index.stats.in_region,
            malformed = index.stats.malformed,
            "Marker index loaded"
        );
        Ok(index)
    }

    /// Parses index lines from any reader.
    pub fn from_reader<R: BufRead>(reader: R, region: Region) -> Result<Self, MarkerError> {
        let mut index = Self::empty(region)?;

        for line in reader.lines() {
            let line = line.map_err(|source| MarkerError::Io {
                path: INDEX_FILE_NAME.into(),
                source,
            })?;
            index.stats.lines += 1;

            match parse_line(&line) {
                Some(coord) => {
                    if region.contains(coord) {
                        index.done.add(coord);
                        index.stats.in_region += 1;
                    }
                }
                None if line.trim().is_empty() => {}
                None => {
                    index.stats.malformed += 1;
                    if index.stats.malformed <= 10 {
                        warn!(line_no = index.stats.lines, line = %line, "Skipping malformed marker index line");
                    }
                }
            }
        }

        debug!(runs = index.done.run_count(), "Marker index compacted");
        Ok(index)
    }

    /// Counters from loading.
    pub fn stats(&self) -> IndexLoadStats {
        self.stats
    }

    /// The finished cells inside the region.
    pub fn done(&self) -> &GridIndex {
        &self.done
    }
}

impl MarkerSource for MarkerIndex {
    fn is_done(&self, coord: ChunkCoord) -> Result<bool, MarkerError> {
        Ok(self.done.contains(coord))
    }
}

fn parse_line(line: &str) -> Option<ChunkCoord> {
    let mut tokens = line.trim_end_matches(['\r', '\n']).split('\t');
    let x = tokens.next()?.trim().parse().ok()?;
    let z = tokens.next()?.trim().parse().ok()?;
    Some(ChunkCoord::new(x, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn region() -> Region {
        Region::from_corners(ChunkCoord::new(0, 0), ChunkCoord::new(2, 1))
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("3\t-4"), Some(ChunkCoord::new(3, -4)));
        assert_eq!(parse_line("3\t-4\r"), Some(ChunkCoord::new(3, -4)));
        assert_eq!(parse_line("3\t-4\textra"), Some(ChunkCoord::new(3, -4)));
        assert_eq!(parse_line("3 -4"), None);
        assert_eq!(parse_line("x\t1"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_from_reader_keeps_only_region_cells() {
        let data = "1\t0\n2\t1\n50\t50\n-1\t0\n";
        let index = MarkerIndex::from_reader(Cursor::new(data), region()).unwrap();

        assert!(index.is_done(ChunkCoord::new(1, 0)).unwrap());
        assert!(index.is_done(ChunkCoord::new(2, 1)).unwrap());
        assert!(!index.is_done(ChunkCoord::new(0, 0)).unwrap());
        assert!(!index.is_done(ChunkCoord::new(50, 50)).unwrap());
        assert_eq!(
            index.stats(),
            IndexLoadStats {
                lines: 4,
                in_region: 2,
                malformed: 0
            }
        );
    }

    #[test]
    fn test_malformed_lines_are_counted_not_fatal() {
        let data = "1\t0\ngarbage\n\n0\t1\n";
        let index = MarkerIndex::from_reader(Cursor::new(data), region()).unwrap();
        assert_eq!(index.stats().malformed, 1);
        assert_eq!(index.done().len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let index = MarkerIndex::load(temp.path(), region()).unwrap();
        assert!(index.done().is_empty());
        assert_eq!(index.stats(), IndexLoadStats::default());
    }

    #[test]
    fn test_load_from_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join(INDEX_FILE_NAME), "0\t0\n0\t1\n").unwrap();
        let index = MarkerIndex::load(temp.path(), region()).unwrap();
        assert_eq!(index.done().len(), 2);
        assert_eq!(index.done().run_count(), 1);
    }
}
