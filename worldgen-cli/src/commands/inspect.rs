//! The `inspect` command: report which cells still lack a marker.

use std::path::Path;

use clap::Args;
use tokio_util::sync::CancellationToken;
use worldgen::inspect::start_inspection;
use worldgen::task::Task;

use super::common::TargetArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `worldgen inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print every pending cell as an `x<TAB>z` line
    #[arg(long)]
    pub list: bool,
}

/// Run the `inspect` command.
pub fn run(args: InspectArgs, config_path: Option<&Path>, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path, verbose)?;
    runner.log_startup("inspect");
    let config = runner.config();

    let region = args.target.region();
    let total = region.area()?;
    let location = args.target.location(config)?;
    let pacing = config.orchestrator_config();

    let mut task = start_inspection(
        args.target.strategy(config),
        &location,
        region,
        pacing.work_budget,
        CancellationToken::new(),
    )?;

    // No other work competes for this process, so run slices back to back.
    while !task.is_finished() {
        task.resume();
    }
    task.log_progress();
    let pending = task.into_pending();

    if args.list {
        for coord in pending.iter() {
            println!("{}\t{}", coord.x, coord.z);
        }
    } else {
        println!(
            "{} of {} cells in {} pending ({} contiguous runs)",
            pending.len(),
            total,
            region,
            pending.run_count()
        );
    }
    Ok(())
}
