//! Reclaim Domain Layer
//!
//! This crate contains the vocabulary shared by every other Reclaim crate:
//! the tables a sweep touches, the trashable kinds and their deletion plans,
//! row filters, the clock, the retention policy and the record store trait.
//!
//! ## Key Concepts
//!
//! - **Sweep**: one execution of the ordered cleanup tasks
//! - **Soft delete**: a row marked with `dateDeleted`, still present
//! - **Hard delete**: permanent row removal, together with dependent rows
//! - **Retention window**: how long a stale or trashed row is kept
//!
//! ## Architecture
//!
//! - Pure logic only; no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod filter;
pub mod policy;
pub mod record;
pub mod trashable;
pub mod traits;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::{Condition, Filter, Select};
pub use policy::RetentionPolicy;
pub use record::{format_timestamp, RecordId, Table};
pub use trashable::{DeletionPlan, Dependent, Link, TrashableKind};
pub use traits::RecordStore;
