//! The `run` command: inspect a region, then generate every pending cell.
//!
//! The command owns the scheduler: a tokio interval ticks the controller at
//! the configured cadence until the run ends or Ctrl+C stops it.

use std::path::Path;
use std::time::Duration;

use clap::Args;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use worldgen::config::ConfigFile;
use worldgen::generate::CommandMaterializer;
use worldgen::orchestrator::{Controller, Phase, RunStatus};
use worldgen::throttle::{
    AlwaysAllow, CloudWatchCli, CreditThrottle, Ec2MetadataResolver, GenerationGate,
};

use super::common::TargetArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `worldgen run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Command run once per cell; {x} and {z} are replaced by the cell coordinates
    #[arg(long, value_name = "COMMAND")]
    pub exec: String,

    /// Generate regardless of the instance's credit balance
    #[arg(long)]
    pub no_throttle: bool,
}

/// Run the `run` command.
pub fn run(args: RunArgs, config_path: Option<&Path>, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path, verbose)?;
    runner.log_startup("run");
    let config = runner.config();

    let materializer = CommandMaterializer::parse(&args.exec)
        .ok_or_else(|| CliError::InvalidArgs("--exec must name a program".to_string()))?;
    let request = args.target.request();
    // Reject regions the pending index cannot address before doing anything.
    request.region.area()?;

    let gate = build_gate(config, args.no_throttle);
    let mut controller = Controller::new(
        args.target.database(config),
        args.target.strategy(config),
        config.orchestrator_config(),
    );
    let id = controller.start(request, Box::new(materializer), gate)?;

    println!("Started {} over {} (Ctrl+C to stop)", id, args.target.region());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let status = runtime.block_on(drive(&mut controller, config.tick_interval()));

    match status {
        Some(status) => {
            println!("{} {}: {}", status.id, status.phase, status.stats);
        }
        None => println!("{} ended", id),
    }
    Ok(())
}

/// Builds the generation gate from config and flags.
fn build_gate(config: &ConfigFile, disabled: bool) -> Box<dyn GenerationGate> {
    if disabled || !config.throttle.enabled {
        info!("Credit throttling disabled");
        return Box::new(AlwaysAllow);
    }
    Box::new(CreditThrottle::new(
        config.throttle_config(),
        &Ec2MetadataResolver::default(),
        Box::new(CloudWatchCli::default()),
    ))
}

/// Ticks the controller until the run ends or Ctrl+C is received.
///
/// Returns the last status seen.
async fn drive(controller: &mut Controller, tick_interval: Duration) -> Option<RunStatus> {
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping run");
                signal.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    });

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = controller.status();

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                let status = controller.status();
                if controller.stop().is_err() {
                    return last;
                }
                return status.map(|s| RunStatus {
                    phase: Phase::Cancelled,
                    ..s
                });
            }

            _ = ticker.tick() => {
                match controller.tick() {
                    Some(status) if status.phase.is_terminal() => return Some(status),
                    Some(status) => last = Some(status),
                    None => return last,
                }
            }
        }
    }
}
