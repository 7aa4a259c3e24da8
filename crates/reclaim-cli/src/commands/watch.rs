//! Watch command implementation.

use crate::cli::WatchArgs;
use crate::error::Result;
use crate::output::Formatter;
use reclaim_janitor::{JanitorConfig, JanitorWorker};
use reclaim_store::SqliteStore;

/// Execute the watch command.
///
/// Sweeps every `sweep_interval_secs` until Ctrl+C, or for `--cycles` sweeps,
/// then prints the accumulated metrics.
pub async fn execute_watch(
    args: WatchArgs,
    config: JanitorConfig,
    store: SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let mut worker = JanitorWorker::new(config)?;

    match args.cycles {
        Some(cycles) => worker.run_cycles(store, cycles).await?,
        None => worker.run(store).await?,
    }

    println!("{}", formatter.format_metrics(worker.metrics())?);
    Ok(())
}
