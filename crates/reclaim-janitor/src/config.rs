//! Configuration for Janitor operations
//!
//! Defines the run probability, retention windows and sweep intervals.

use crate::JanitorError;
use reclaim_domain::policy::{duration_from_secs, DEFAULT_SOFT_DELETE_SECS};
use reclaim_domain::RetentionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound of the probability scale (parts per million)
pub const MAX_PROBABILITY: u32 = 1_000_000;

/// Largest accepted `batch_size`
///
/// A chunk of ids is bound as one parameter each, plus a timestamp or two,
/// and SQLite accepts at most 32766 parameters per statement.
pub const MAX_BATCH_SIZE: usize = 32_000;

/// Configuration for the Janitor service
///
/// Controls how often an unforced run actually sweeps, how long trashed and
/// pending rows are kept, and operational modes.
///
/// # Examples
///
/// ```
/// use reclaim_janitor::JanitorConfig;
///
/// // Default configuration (balanced)
/// let config = JanitorConfig::default();
/// assert_eq!(config.probability, 10);
///
/// // Aggressive cleanup
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.soft_delete_duration_secs, 7 * 86_400);
///
/// // Lenient cleanup
/// let config = JanitorConfig::lenient();
/// assert_eq!(config.soft_delete_duration_secs, 90 * 86_400);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Chance, in parts per million, that an unforced run sweeps
    /// Default: 10 (0.001%). 0 disables unforced runs entirely.
    #[serde(default = "default_probability")]
    pub probability: u32,

    /// Purge every trashed row regardless of how long ago it was trashed
    /// Default: false
    #[serde(default)]
    pub delete_all_trashed: bool,

    /// How long a pending user may sit on an unused verification code (in seconds)
    /// Default: unset, pending users are never purged
    #[serde(default)]
    pub purge_pending_users_duration_secs: Option<u64>,

    /// How long a trashed row is kept before hard deletion (in seconds)
    /// Default: 30 days
    #[serde(default = "default_soft_delete_duration")]
    pub soft_delete_duration_secs: u64,

    /// Dry-run mode: Log what would be deleted without actually deleting
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Maximum ids per delete statement
    /// Default: 500
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// How often the background worker sweeps (in seconds)
    /// Default: every hour
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_probability() -> u32 {
    10
}

fn default_soft_delete_duration() -> u64 {
    DEFAULT_SOFT_DELETE_SECS
}

fn default_batch_size() -> usize {
    500
}

fn default_sweep_interval() -> u64 {
    3600
}

/// On-disk layout: settings live under a `[janitor]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    janitor: JanitorConfig,
}

impl Default for JanitorConfig {
    /// Create default configuration
    ///
    /// - Probability: 10 ppm
    /// - Pending users: never purged
    /// - Trashed rows: 30 days
    /// - Batch size: 500
    /// - Sweep interval: 1 hour
    fn default() -> Self {
        Self {
            probability: default_probability(),
            delete_all_trashed: false,
            purge_pending_users_duration_secs: None,
            soft_delete_duration_secs: default_soft_delete_duration(),
            dry_run: false,
            batch_size: default_batch_size(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl JanitorConfig {
    /// Aggressive cleanup configuration (short windows, frequent sweeps)
    ///
    /// - Pending users: 3 days
    /// - Trashed rows: 7 days
    /// - Sweep interval: 15 minutes
    pub fn aggressive() -> Self {
        Self {
            probability: 100,
            purge_pending_users_duration_secs: Some(3 * 86_400),
            soft_delete_duration_secs: 7 * 86_400,
            sweep_interval_secs: 900,
            ..Self::default()
        }
    }

    /// Lenient cleanup configuration (long windows, infrequent sweeps)
    ///
    /// - Pending users: never purged
    /// - Trashed rows: 90 days
    /// - Sweep interval: 6 hours
    pub fn lenient() -> Self {
        Self {
            probability: 1,
            soft_delete_duration_secs: 90 * 86_400,
            sweep_interval_secs: 6 * 3600,
            ..Self::default()
        }
    }

    /// Parse a `[janitor]` TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, JanitorError> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| JanitorError::Configuration(format!("Failed to parse config TOML: {}", e)))?;
        file.janitor.validate()?;
        Ok(file.janitor)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JanitorError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JanitorError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings the janitor cannot honor
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.probability > MAX_PROBABILITY {
            return Err(JanitorError::Configuration(format!(
                "probability must be between 0 and {}, got {}",
                MAX_PROBABILITY, self.probability
            )));
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(JanitorError::Configuration(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.batch_size
            )));
        }
        if self.sweep_interval_secs == 0 {
            return Err(JanitorError::Configuration(
                "sweep_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Resolve the retention windows
    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            purge_pending_users: self.purge_pending_users_duration_secs.map(duration_from_secs),
            soft_delete: duration_from_secs(self.soft_delete_duration_secs),
            delete_all_trashed: self.delete_all_trashed,
        }
    }
}
