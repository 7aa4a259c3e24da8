//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reclaim CLI - Run retention sweeps against a content database.
#[derive(Debug, Parser)]
#[command(name = "reclaim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path
    #[arg(short, long, global = true, env = "RECLAIM_DB", default_value = "reclaim.db")]
    pub db: PathBuf,

    /// Janitor configuration file (TOML, `[janitor]` table)
    #[arg(short, long, global = true, env = "RECLAIM_CONFIG", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in configuration preset
    #[arg(short, long, value_enum, global = true)]
    pub preset: Option<PresetArg>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// 30-day trash window, pending users kept
    Default,
    /// Short windows, frequent sweeps
    Aggressive,
    /// Long windows, infrequent sweeps
    Lenient,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the janitor once
    Run(RunArgs),

    /// Show how many rows a sweep would touch right now
    Preview,

    /// Sweep on the configured interval until Ctrl+C
    Watch(WatchArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Sweep regardless of the configured probability
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Count candidates without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Stop after this many sweeps
    #[arg(long)]
    pub cycles: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["reclaim", "run", "--force", "--dry-run"]);
        match cli.command {
            Command::Run(args) => {
                assert!(args.force);
                assert!(args.dry_run);
            }
            _ => panic!("Expected Run command"),
        }
        assert_eq!(cli.format, CliFormat::Table);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "reclaim", "preview", "--db", "/tmp/site.db", "--format", "json", "--preset", "aggressive",
        ]);
        assert!(matches!(cli.command, Command::Preview));
        assert_eq!(cli.db, PathBuf::from("/tmp/site.db"));
        assert_eq!(cli.format, CliFormat::Json);
        assert_eq!(cli.preset, Some(PresetArg::Aggressive));
    }

    #[test]
    fn test_watch_cycles() {
        let cli = Cli::parse_from(["reclaim", "watch", "--cycles", "3"]);
        match cli.command {
            Command::Watch(args) => assert_eq!(args.cycles, Some(3)),
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_config_conflicts_with_preset() {
        let result = Cli::try_parse_from([
            "reclaim", "run", "--config", "janitor.toml", "--preset", "lenient",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["reclaim"]).is_err());
    }
}
