//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so each command
//! handler starts from the same state.

use std::path::Path;

use tracing::info;
use worldgen::config::ConfigFile;
use worldgen::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Loads the config file (defaults if absent) and starts logging to the
    /// configured file and stderr.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file to use instead of `~/.worldgen/config.ini`
    /// * `verbose` - When true, enables debug-level logging unless RUST_LOG is set
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.file, true, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("worldgen v{}", worldgen::VERSION);
        info!(
            log_file = %self.config.logging.file.display(),
            "worldgen CLI: {} command",
            command
        );
    }
}
