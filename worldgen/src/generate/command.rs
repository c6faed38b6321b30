//! Materializing cells by running an external program.

use std::process::{Command, Stdio};

use tracing::debug;

use super::{MaterializeError, Materializer};
use crate::coord::ChunkCoord;

/// Runs a program once per cell.
///
/// Arguments may contain `{x}` and `{z}`, which are replaced by the cell
/// coordinates. A non-zero exit status fails the cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMaterializer {
    program: String,
    args: Vec<String>,
}

impl CommandMaterializer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a whitespace-separated command line. Returns `None` if empty.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders filled in for `coord`.
    pub fn args_for(&self, coord: ChunkCoord) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{x}", &coord.x.to_string())
                    .replace("{z}", &coord.z.to_string())
            })
            .collect()
    }
}

impl Materializer for CommandMaterializer {
    fn materialize(&mut self, coord: ChunkCoord) -> Result<(), MaterializeError> {
        let args = self.args_for(coord);
        debug!(program = %self.program, ?args, %coord, "Materializing cell");

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| MaterializeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(MaterializeError::ExitStatus {
                coord,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_substituted() {
        let cmd = CommandMaterializer::parse("gen --at {x},{z} --x={x}").unwrap();
        assert_eq!(cmd.program(), "gen");
        assert_eq!(
            cmd.args_for(ChunkCoord::new(-3, 7)),
            vec!["--at", "-3,7", "--x=-3"]
        );
    }

    #[test]
    fn test_empty_command_line() {
        assert!(CommandMaterializer::parse("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_checked() {
        let mut ok = CommandMaterializer::parse("true").unwrap();
        assert!(ok.materialize(ChunkCoord::new(0, 0)).is_ok());

        let mut failing = CommandMaterializer::parse("false").unwrap();
        assert!(matches!(
            failing.materialize(ChunkCoord::new(0, 0)),
            Err(MaterializeError::ExitStatus { .. })
        ));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut cmd = CommandMaterializer::parse("/nonexistent/worldgen-test-program").unwrap();
        assert!(matches!(
            cmd.materialize(ChunkCoord::new(0, 0)),
            Err(MaterializeError::Spawn { .. })
        ));
    }
}
