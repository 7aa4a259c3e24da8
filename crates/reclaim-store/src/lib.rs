//! Reclaim Storage Layer
//!
//! Implements the RecordStore trait on top of SQLite.
//!
//! # Architecture
//!
//! - `schema.sql` creates the tables the sweep reads and purges
//! - [`Filter`]s are rendered to parameterized `WHERE` clauses
//! - `delete_batch` runs in a single transaction, so a kind's dependent
//!   rows and parent rows disappear together or not at all
//!
//! # Examples
//!
//! ```no_run
//! use reclaim_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for sweeps
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use reclaim_domain::{format_timestamp, Condition, Filter, RecordId, RecordStore, Table};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of RecordStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reclaim_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("reclaim.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Execute raw SQL statements (fixtures, host-side seeding)
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Number of rows in `table`
    pub fn count(&self, table: Table) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote(table.as_str()));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("Negative row count for {}", table)))
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

/// Render a filter as a `WHERE` clause plus its parameters
fn where_clause(filter: &Filter) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut params = Vec::new();
    push_conditions(filter, &mut sql, &mut params);
    (sql, params)
}

fn push_conditions(filter: &Filter, sql: &mut String, params: &mut Vec<Value>) {
    for condition in &filter.conditions {
        match condition {
            Condition::Before { column, cutoff } => {
                // NULL < ? is NULL in SQL, so NULL timestamps never match
                sql.push_str(&format!(" AND {} < ?", quote(column)));
                params.push(Value::Text(format_timestamp(*cutoff)));
            }
            Condition::NotNull(column) => {
                sql.push_str(&format!(" AND {} IS NOT NULL", quote(column)));
            }
            Condition::IsNull(column) => {
                sql.push_str(&format!(" AND {} IS NULL", quote(column)));
            }
            Condition::IsTrue(column) => {
                sql.push_str(&format!(" AND {} = 1", quote(column)));
            }
            Condition::In { column, ids } => {
                if ids.is_empty() {
                    sql.push_str(" AND 0");
                    continue;
                }
                let placeholders = vec!["?"; ids.len()].join(", ");
                sql.push_str(&format!(" AND {} IN ({})", quote(column), placeholders));
                params.extend(ids.iter().map(|id| Value::Integer(id.value())));
            }
            Condition::InSelect { column, select } => {
                sql.push_str(&format!(
                    " AND {} IN (SELECT {} FROM {} WHERE 1=1",
                    quote(column),
                    quote(select.key),
                    quote(select.table.as_str())
                ));
                push_conditions(&select.filter, sql, params);
                sql.push(')');
            }
        }
    }
}

fn delete_sql(table: Table, filter: &Filter) -> (String, Vec<Value>) {
    let (clause, params) = where_clause(filter);
    (format!("DELETE FROM {}{}", quote(table.as_str()), clause), params)
}

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn select_ids(&self, table: Table, filter: &Filter) -> Result<Vec<RecordId>, Self::Error> {
        if filter.matches_nothing() {
            return Ok(Vec::new());
        }

        let (clause, params) = where_clause(filter);
        let sql = format!("SELECT id FROM {}{} ORDER BY id", quote(table.as_str()), clause);

        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(params), |row| row.get::<_, i64>(0))?
            .map(|id| id.map(RecordId::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn delete(&mut self, table: Table, filter: &Filter) -> Result<usize, Self::Error> {
        if filter.matches_nothing() {
            return Ok(0);
        }

        let (sql, params) = delete_sql(table, filter);
        Ok(self.conn.execute(&sql, params_from_iter(params))?)
    }

    fn set_timestamp(
        &mut self,
        table: Table,
        column: &'static str,
        value: DateTime<Utc>,
        filter: &Filter,
    ) -> Result<usize, Self::Error> {
        if filter.matches_nothing() {
            return Ok(0);
        }

        let (clause, filter_params) = where_clause(filter);
        let sql = format!(
            "UPDATE {} SET {} = ?{}",
            quote(table.as_str()),
            quote(column),
            clause
        );

        let mut params = vec![Value::Text(format_timestamp(value))];
        params.extend(filter_params);

        Ok(self.conn.execute(&sql, params_from_iter(params))?)
    }

    fn delete_batch(&mut self, steps: &[(Table, Filter)]) -> Result<usize, Self::Error> {
        let tx = self.conn.transaction()?;
        let mut total = 0;

        for (table, filter) in steps {
            if filter.matches_nothing() {
                continue;
            }
            let (sql, params) = delete_sql(*table, filter);
            total += tx.execute(&sql, params_from_iter(params))?;
        }

        tx.commit()?;
        Ok(total)
    }
}
