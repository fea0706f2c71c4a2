// Database gateway: the sole owner of the physical connection.
//
// The session only ever talks to the object-safe `Gateway` trait, so the
// whole menu loop can be exercised in tests against a recording mock.

mod pg;

pub use pg::PgGateway;

use crate::core::{HotelError, SqlValue};

/// A fully materialized query result: column-name header plus every row
/// stringified, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Executes statements against the database.
///
/// Exactly one statement is in flight at a time; the session is
/// single-threaded and blocks on each call.
pub trait Gateway {
    /// Executes a write statement (INSERT/UPDATE/DELETE) and returns the
    /// number of affected rows.
    fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, HotelError>;

    /// Executes a SELECT and returns the stringified result set.
    fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, HotelError>;
}
