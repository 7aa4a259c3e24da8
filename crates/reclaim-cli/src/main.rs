//! Reclaim CLI - Command-line interface for retention sweeps.

use clap::Parser;
use reclaim_cli::commands;
use reclaim_cli::{config, Cli, Command, Formatter};
use reclaim_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> reclaim_cli::Result<()> {
    let cli = Cli::parse();

    let janitor_config = config::from_cli(&cli)?;
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    tracing::debug!(db = %cli.db.display(), "Opening store");
    let mut store = SqliteStore::new(&cli.db)?;

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, janitor_config, &mut store, &formatter)?;
        }
        Command::Preview => {
            commands::execute_preview(janitor_config, &store, &formatter)?;
        }
        Command::Watch(args) => {
            commands::execute_watch(args, janitor_config, store, &formatter).await?;
        }
    }

    Ok(())
}
