//! Configuration file handling for `~/.worldgen/config.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`],
//! parsing in `parser` and serialization in `writer`. [`ConfigFile`]
//! converts the loaded values into the library's runtime configuration
//! types.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, MarkerSettings, RunSettings, ThrottleSettings};
