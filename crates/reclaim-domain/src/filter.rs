//! Filter module - conjunctive row predicates understood by every store

use crate::{RecordId, Table};
use chrono::{DateTime, Utc};

/// A single predicate on one column
///
/// Column names are static identifiers owned by the sweep, never user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column < cutoff`; rows where the column is NULL never match
    Before {
        /// Timestamp column
        column: &'static str,
        /// Exclusive upper bound
        cutoff: DateTime<Utc>,
    },
    /// `column IS NOT NULL`
    NotNull(&'static str),
    /// `column IS NULL`
    IsNull(&'static str),
    /// Boolean column is true
    IsTrue(&'static str),
    /// `column IN (ids)`; an empty list matches nothing
    In {
        /// Integer key column
        column: &'static str,
        /// Accepted values
        ids: Vec<RecordId>,
    },
    /// `column IN (SELECT key FROM table WHERE ...)`
    InSelect {
        /// Integer key column
        column: &'static str,
        /// Rows whose key is accepted
        select: Box<Select>,
    },
}

/// One key column of the rows of `table` matching `filter`
///
/// Evaluated by the store at statement time, so it sees rows as they are
/// inside the enclosing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Table queried
    pub table: Table,
    /// Column returned
    pub key: &'static str,
    /// Rows considered
    pub filter: Filter,
}

/// Conjunction of conditions; an empty filter matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// All conditions must hold
    pub conditions: Vec<Condition>,
}

impl Filter {
    /// Filter matching every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Add `column < cutoff`
    pub fn before(mut self, column: &'static str, cutoff: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Before { column, cutoff });
        self
    }

    /// Add `column IS NOT NULL`
    pub fn not_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::NotNull(column));
        self
    }

    /// Add `column IS NULL`
    pub fn is_null(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::IsNull(column));
        self
    }

    /// Add "column is true"
    pub fn is_true(mut self, column: &'static str) -> Self {
        self.conditions.push(Condition::IsTrue(column));
        self
    }

    /// Add `column IN (ids)`
    pub fn id_in(mut self, column: &'static str, ids: &[RecordId]) -> Self {
        self.conditions.push(Condition::In {
            column,
            ids: ids.to_vec(),
        });
        self
    }

    /// Add `column IN (SELECT key FROM table WHERE filter)`
    pub fn in_select(
        mut self,
        column: &'static str,
        table: Table,
        key: &'static str,
        filter: Filter,
    ) -> Self {
        self.conditions.push(Condition::InSelect {
            column,
            select: Box::new(Select { table, key, filter }),
        });
        self
    }

    /// True when some `In` condition has an empty id list, directly or
    /// inside a sub-select
    ///
    /// Stores can short-circuit such filters without touching the database.
    pub fn matches_nothing(&self) -> bool {
        self.conditions.iter().any(|c| match c {
            Condition::In { ids, .. } => ids.is_empty(),
            Condition::InSelect { select, .. } => select.filter.matches_nothing(),
            _ => false,
        })
    }
}
