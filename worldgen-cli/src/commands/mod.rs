//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`inspect`] - Report pending cells without generating
//! - [`run`] - Inspect and generate a region

pub mod common;
pub mod config;
pub mod inspect;
pub mod run;
