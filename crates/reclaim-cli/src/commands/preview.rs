//! Preview command implementation.

use crate::error::Result;
use crate::output::Formatter;
use reclaim_janitor::{Janitor, JanitorConfig};
use reclaim_store::SqliteStore;

/// Execute the preview command.
///
/// Counts what a sweep would touch now. Nothing is deleted and the
/// probability is ignored.
pub fn execute_preview(
    config: JanitorConfig,
    store: &SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let janitor = Janitor::new(config)?;
    let report = janitor.preview(store)?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
