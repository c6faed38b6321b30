//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::process;

use worldgen::config::ConfigFileError;
use worldgen::coord::CoordError;
use worldgen::marker::MarkerError;
use worldgen::orchestrator::ControlError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// The region cannot be processed
    Region(CoordError),
    /// Marker state could not be read
    Markers(MarkerError),
    /// The run could not be started
    Start(ControlError),
    /// Failed to start the async runtime
    Runtime(io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Markers(MarkerError::InvalidVersion(_))
            | CliError::Start(ControlError::Start(_)) => {
                eprintln!();
                eprintln!("Markers are read from <database>/<version>/<dimension id>.");
                eprintln!("Check [markers] database in the config file ('worldgen config path').");
            }
            CliError::ConfigFile(_) => {
                eprintln!();
                eprintln!("Run 'worldgen config show' to see the effective settings.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Region(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::Region(e) => write!(f, "Invalid region: {}", e),
            CliError::Markers(e) => write!(f, "{}", e),
            CliError::Start(e) => write!(f, "Failed to start run: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Region(e) => Some(e),
            CliError::Markers(e) => Some(e),
            CliError::Start(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Region(e)
    }
}

impl From<MarkerError> for CliError {
    fn from(e: MarkerError) -> Self {
        CliError::Markers(e)
    }
}

impl From<ControlError> for CliError {
    fn from(e: ControlError) -> Self {
        CliError::Start(e)
    }
}
