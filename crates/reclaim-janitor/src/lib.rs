//! Reclaim Janitor
//!
//! Retention sweeps for a content store: background maintenance that purges
//! what the host application has abandoned.
//!
//! # Overview
//!
//! A sweep runs a fixed, ordered list of cleanup tasks:
//!
//! | Task | Rows | Eligible when | Effect |
//! |------|------|---------------|--------|
//! | `pending_users` | users | pending and code issued before the window | soft delete (`dateDeleted := now`) |
//! | `stale_sessions` | sessions | not updated for 3 months | hard delete |
//! | `trashed_*` | elements, entry types, sections, volumes | trashed before the window, or any trashed row with `delete_all_trashed` | hard delete with dependents |
//!
//! Once every task succeeded, registered [`SweepObserver`]s are notified.
//! A store error aborts the sweep; later tasks are not attempted.
//!
//! # Usage
//!
//! ## Per-request trigger
//!
//! ```no_run
//! use reclaim_janitor::{Janitor, JanitorConfig};
//! use reclaim_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("reclaim.db")?;
//! let mut janitor = Janitor::new(JanitorConfig::default())?;
//!
//! // Sweeps with probability `probability / 1_000_000`
//! if let Err(e) = janitor.run(&mut store, false) {
//!     // Sweeps are best-effort; never fail the request over one
//!     eprintln!("sweep failed: {}", e);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use reclaim_janitor::{JanitorWorker, JanitorConfig};
//! use reclaim_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::new("reclaim.db")?;
//!     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
//!
//!     // Run indefinitely (until Ctrl+C)
//!     worker.run(store).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! probability = 10
//! delete_all_trashed = false
//! purge_pending_users_duration_secs = 172800
//! soft_delete_duration_secs = 2592000
//! dry_run = false
//! batch_size = 500
//! sweep_interval_secs = 3600
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod observer;
mod report;
pub mod task;
mod worker;

pub use config::{JanitorConfig, MAX_BATCH_SIZE, MAX_PROBABILITY};
pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
pub use observer::SweepObserver;
pub use report::{SweepOutcome, SweepReport, TaskReport};
pub use task::CleanupTask;
pub use worker::JanitorWorker;
