//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Janitor error (configuration, persistence, worker)
    #[error(transparent)]
    Janitor(#[from] reclaim_janitor::JanitorError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] reclaim_store::StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
