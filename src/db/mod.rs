//! The database interface consumed by [`LogicalTable`](crate::model::logical_table::LogicalTable).
//!
//! This is an external collaborator: the core only depends on the traits
//! below, never on a concrete driver. [`sqlite`] provides one concrete,
//! file-backed implementation so the CLI has something real to run
//! against.

#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::value::RowCursor;
use crate::R2rmlError;

/// A connection able to execute a SQL string and hand back a cursor.
///
/// Column-name matching is case-insensitive via ASCII-uppercase folding:
/// implementations are expected to uppercase column names when building
/// each [`Row`](crate::value::Row) (see §6).
pub trait SqlConnection {
    fn execute(&self, sql_query: &str) -> Result<Box<dyn RowCursor>, R2rmlError>;
}
