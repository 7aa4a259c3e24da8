//! Run command implementation.

use crate::cli::RunArgs;
use crate::error::Result;
use crate::output::Formatter;
use reclaim_janitor::{Janitor, JanitorConfig, SweepOutcome};
use reclaim_store::SqliteStore;

/// Execute the run command.
pub fn execute_run(
    args: RunArgs,
    config: JanitorConfig,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let outcome = run_once(&args, config, store)?;
    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(())
}

/// Apply the flag overrides and run the janitor once.
fn run_once(
    args: &RunArgs,
    mut config: JanitorConfig,
    store: &mut SqliteStore,
) -> Result<SweepOutcome> {
    if args.dry_run {
        config.dry_run = true;
    }

    let mut janitor = Janitor::new(config)?;
    Ok(janitor.run(store, args.force)?)
}
