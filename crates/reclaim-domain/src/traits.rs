//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the sweep and infrastructure.
//! Implementations live in other crates.

use crate::{Filter, RecordId, Table};
use chrono::{DateTime, Utc};

/// Trait for reading and deleting rows
///
/// Implemented by the infrastructure layer (reclaim-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Primary keys (`id`) of the rows of `table` matching `filter`
    fn select_ids(&self, table: Table, filter: &Filter) -> Result<Vec<RecordId>, Self::Error>;

    /// Delete the rows of `table` matching `filter`; returns rows removed
    fn delete(&mut self, table: Table, filter: &Filter) -> Result<usize, Self::Error>;

    /// Set a timestamp column on the rows matching `filter`; returns rows changed
    fn set_timestamp(
        &mut self,
        table: Table,
        column: &'static str,
        value: DateTime<Utc>,
        filter: &Filter,
    ) -> Result<usize, Self::Error>;

    /// Run several deletes as one unit; returns the total rows removed
    ///
    /// The default runs them in order without atomicity. Stores with
    /// transactions should override it so a failure leaves nothing half-purged.
    fn delete_batch(&mut self, steps: &[(Table, Filter)]) -> Result<usize, Self::Error> {
        let mut total = 0;
        for (table, filter) in steps {
            total += self.delete(*table, filter)?;
        }
        Ok(total)
    }
}
