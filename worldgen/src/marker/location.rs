//! Resolving the marker directory for a dataset.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::MarkerError;

/// World dimension a run targets. Each has its own marker directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Numeric id used as the directory name.
    pub fn id(&self) -> i32 {
        match self {
            Dimension::Overworld => 0,
            Dimension::Nether => -1,
            Dimension::End => 1,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
        };
        f.write_str(name)
    }
}

impl FromStr for Dimension {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overworld" | "normal" | "0" => Ok(Dimension::Overworld),
            "nether" | "-1" => Ok(Dimension::Nether),
            "end" | "the_end" | "1" => Ok(Dimension::End),
            other => Err(MarkerError::UnknownDimension(other.to_string())),
        }
    }
}

/// Directory holding the markers of one dataset version and dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLocation {
    dir: PathBuf,
}

impl IndexLocation {
    /// Resolves `{database}/{version}/{dimension id}`.
    ///
    /// The version label must be a single, non-empty path component.
    pub fn resolve(
        database: &Path,
        version: &str,
        dimension: Dimension,
    ) -> Result<Self, MarkerError> {
        let version = version.trim();
        let is_component = !version.is_empty()
            && version != "."
            && version != ".."
            && !version.contains(['/', '\\']);
        if !is_component {
            return Err(MarkerError::InvalidVersion(version.to_string()));
        }

        Ok(Self {
            dir: database.join(version).join(dimension.id().to_string()),
        })
    }

    /// Uses an explicit directory as-is.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The marker directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_ids() {
        assert_eq!(Dimension::Overworld.id(), 0);
        assert_eq!(Dimension::Nether.id(), -1);
        assert_eq!(Dimension::End.id(), 1);
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("nether".parse::<Dimension>().unwrap(), Dimension::Nether);
        assert_eq!("THE_END".parse::<Dimension>().unwrap(), Dimension::End);
        assert_eq!("0".parse::<Dimension>().unwrap(), Dimension::Overworld);
        assert!(matches!(
            "aether".parse::<Dimension>(),
            Err(MarkerError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_resolve_layout() {
        let loc = IndexLocation::resolve(Path::new("/db"), "1.16.5", Dimension::Nether).unwrap();
        assert_eq!(loc.dir(), Path::new("/db/1.16.5/-1"));
    }

    #[test]
    fn test_resolve_rejects_bad_versions() {
        for bad in ["", "  ", "..", "a/b", "a\\b"] {
            assert!(
                matches!(
                    IndexLocation::resolve(Path::new("/db"), bad, Dimension::Overworld),
                    Err(MarkerError::InvalidVersion(_))
                ),
                "version {:?} should be rejected",
                bad
            );
        }
    }
}
