//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Invalid or unreadable configuration; the sweep does not run
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store failure; the remaining tasks of the sweep were skipped
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
