//! A [`SqlConnection`] backed by [`rusqlite`], materialising each query's
//! results into memory before returning a cursor.
//!
//! Rather than keep the driver's own result-set object alive across
//! repeated `next()`/`current()` calls, every row is copied out up front
//! into a `Vec<Row>`, which keeps the cursor contract simple and decouples
//! row lifetime from the underlying driver handle.

use rusqlite::types::ValueRef;
use rusqlite::Connection as RusqliteConnection;
use std::collections::BTreeMap;
use std::path::Path;

use crate::db::SqlConnection;
use crate::value::{Row, RowCursor, Value, VecRowCursor};
use crate::R2rmlError;

pub struct SqliteConnection {
    conn: RusqliteConnection,
}

impl SqliteConnection {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, R2rmlError> {
        let conn = RusqliteConnection::open(path)
            .map_err(|e| R2rmlError::Db(format!("could not open sqlite database: {e}")))?;
        Ok(SqliteConnection { conn })
    }

    /// Runs a multi-statement SQL script (DDL/DML), used to seed a
    /// database ahead of mapping generation.
    pub fn execute_batch(&self, sql: &str) -> Result<(), R2rmlError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| R2rmlError::Db(format!("setup script failed: {e}")))
    }
}

fn sqlite_value_to_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(d) => Value::Double(d),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        // BLOBs have no natural lexical form in R2RML; fall back to a
        // lossless string representation rather than silently truncating.
        ValueRef::Blob(bytes) => Value::String(format!("\\x{}", hex_encode(bytes))),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl SqlConnection for SqliteConnection {
    fn execute(&self, sql_query: &str) -> Result<Box<dyn RowCursor>, R2rmlError> {
        let mut stmt = self
            .conn
            .prepare(sql_query)
            .map_err(|e| R2rmlError::Db(format!("query preparation failed: {e}")))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let mut rows = Vec::new();
        let mut result_rows = stmt
            .query([])
            .map_err(|e| R2rmlError::Db(format!("query execution failed: {e}")))?;

        while let Some(sqlite_row) = result_rows
            .next()
            .map_err(|e| R2rmlError::Db(format!("row fetch failed: {e}")))?
        {
            let mut columns = BTreeMap::new();
            for (idx, name) in column_names.iter().enumerate() {
                let value_ref = sqlite_row
                    .get_ref(idx)
                    .map_err(|e| R2rmlError::Db(format!("column read failed: {e}")))?;
                columns.insert(name.clone(), sqlite_value_to_value(value_ref));
            }
            rows.push(Row::new(columns));
        }

        Ok(Box::new(VecRowCursor::new(rows)))
    }
}
