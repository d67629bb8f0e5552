//! The row source of a triples map: either a plain table/view or an
//! arbitrary SQL query.

use std::cell::RefCell;

use crate::db::SqlConnection;
use crate::value::RowCursor;
use crate::R2rmlError;

/// A logical table, either a direct reference to a base table or view
/// (`rr:tableName`) or an arbitrary SQL query (`rr:sqlQuery`).
pub enum LogicalTable {
    BaseTableOrView {
        table_name: String,
        effective_sql_query: RefCell<Option<String>>,
    },
    R2rmlView {
        sql_query: String,
        /// Optional `rr:sqlVersion` annotations; recorded but never
        /// interpreted by the core.
        sql_versions: Vec<String>,
        effective_sql_query: RefCell<Option<String>>,
    },
}

impl LogicalTable {
    pub fn base_table_or_view(table_name: impl Into<String>) -> Self {
        LogicalTable::BaseTableOrView {
            table_name: table_name.into(),
            effective_sql_query: RefCell::new(None),
        }
    }

    pub fn r2rml_view(sql_query: impl Into<String>) -> Self {
        LogicalTable::R2rmlView {
            sql_query: sql_query.into(),
            sql_versions: Vec::new(),
            effective_sql_query: RefCell::new(None),
        }
    }

    /// Records an `rr:sqlVersion` annotation. No-op on a `BaseTableOrView`
    /// (the predicate only applies to `rr:sqlQuery`-based views).
    pub fn push_sql_version(&mut self, version: impl Into<String>) {
        if let LogicalTable::R2rmlView { sql_versions, .. } = self {
            sql_versions.push(version.into());
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            LogicalTable::BaseTableOrView { table_name, .. } => !table_name.is_empty(),
            LogicalTable::R2rmlView { sql_query, .. } => !sql_query.is_empty(),
        }
    }

    /// The SQL text this logical table actually ran, available after
    /// [`get_rows`](Self::get_rows) has been called at least once.
    pub fn effective_sql_query(&self) -> Option<String> {
        match self {
            LogicalTable::BaseTableOrView {
                effective_sql_query,
                ..
            }
            | LogicalTable::R2rmlView {
                effective_sql_query,
                ..
            } => effective_sql_query.borrow().clone(),
        }
    }

    pub fn get_rows(
        &self,
        conn: &dyn SqlConnection,
    ) -> Result<Box<dyn RowCursor>, R2rmlError> {
        match self {
            LogicalTable::BaseTableOrView {
                table_name,
                effective_sql_query,
            } => {
                let sql = format!("SELECT * FROM \"{table_name}\"");
                *effective_sql_query.borrow_mut() = Some(sql.clone());
                conn.execute(&sql)
            }
            LogicalTable::R2rmlView {
                sql_query,
                effective_sql_query,
                ..
            } => {
                *effective_sql_query.borrow_mut() = Some(sql_query.clone());
                conn.execute(sql_query)
            }
        }
    }
}

impl std::fmt::Display for LogicalTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogicalTable {{ effectiveSqlQuery=\"{}\" }}",
            self.effective_sql_query().unwrap_or_default()
        )
    }
}
