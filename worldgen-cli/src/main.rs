//! worldgen CLI - Command-line interface
//!
//! Drives a generation run over a region, inspects pending cells, and
//! manages the config file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::inspect::InspectArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "worldgen")]
#[command(version = worldgen::VERSION)]
#[command(about = "Resumable, throttled pre-generation of a grid region", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.worldgen/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a region and generate every cell without a marker
    Run(RunArgs),

    /// Report which cells of a region still lack a marker
    Inspect(InspectArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, config_path, cli.verbose),
        Commands::Inspect(args) => commands::inspect::run(args, config_path, cli.verbose),
        Commands::Config { command } => commands::config::run(command, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}
