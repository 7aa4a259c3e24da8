//! Janitor configuration resolution for the CLI.

use crate::cli::{Cli, PresetArg};
use crate::error::Result;
use reclaim_janitor::JanitorConfig;
use std::path::Path;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(format: crate::cli::CliFormat) -> Self {
        match format {
            crate::cli::CliFormat::Table => OutputFormat::Table,
            crate::cli::CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl From<PresetArg> for JanitorConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => JanitorConfig::default(),
            PresetArg::Aggressive => JanitorConfig::aggressive(),
            PresetArg::Lenient => JanitorConfig::lenient(),
        }
    }
}

/// Pick the janitor configuration: a config file, else a preset, else defaults.
///
/// The result is validated; a bad file fails here rather than mid-command.
pub fn resolve(config: Option<&Path>, preset: Option<PresetArg>) -> Result<JanitorConfig> {
    let resolved = match (config, preset) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), "Loading janitor configuration");
            JanitorConfig::from_file(path)?
        }
        (None, Some(preset)) => preset.into(),
        (None, None) => JanitorConfig::default(),
    };

    resolved.validate()?;
    Ok(resolved)
}

/// Resolve the configuration named by the global CLI flags.
pub fn from_cli(cli: &Cli) -> Result<JanitorConfig> {
    resolve(cli.config.as_deref(), cli.preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use reclaim_janitor::JanitorError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(resolve(None, None).unwrap(), JanitorConfig::default());
    }

    #[test]
    fn test_preset() {
        let config = resolve(None, Some(PresetArg::Aggressive)).unwrap();
        assert_eq!(config, JanitorConfig::aggressive());
    }

    #[test]
    fn test_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[janitor]").unwrap();
        writeln!(file, "probability = 0").unwrap();
        writeln!(file, "delete_all_trashed = true").unwrap();

        let config = resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.probability, 0);
        assert!(config.delete_all_trashed);
        assert_eq!(config.batch_size, 500);
    }

    #[test]
    fn test_invalid_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[janitor]").unwrap();
        writeln!(file, "probability = 2000000").unwrap();

        let result = resolve(Some(file.path()), None);
        assert!(matches!(result, Err(CliError::Janitor(JanitorError::Configuration(_)))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = resolve(Some(Path::new("/nonexistent/janitor.toml")), None);
        assert!(matches!(result, Err(CliError::Janitor(JanitorError::Configuration(_)))));
    }
}
