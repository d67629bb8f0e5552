//! Typed cell values and the row they come bundled in.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::R2rmlError;

/// A single SQL cell value.
///
/// Integers and doubles carry whatever precision the driver handed over;
/// a driver that would otherwise lose precision (e.g. a 64-bit integer
/// column on a platform where `Integer` is narrower) should fall back to
/// [`Value::String`] rather than truncate, so that [`Value::lexical_form`]
/// remains lossless.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    String(String),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The canonical string form used for join equality and as a literal's
    /// lexical form. `Null` has no string form.
    pub fn lexical_form(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Integer(i) => Some(Cow::Owned(i.to_string())),
            Value::Double(d) => Some(Cow::Owned(d.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Boolean(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        }
    }
}

/// An immutable, ASCII-uppercase-keyed row.
///
/// Column lookups fold the requested name to uppercase, matching the
/// case-insensitive column matching contract of §6: all `rr:column`,
/// `rr:child`, `rr:parent`, and template placeholders are compared against
/// uppercased column names.
#[derive(Clone, Debug, Default)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(columns: BTreeMap<String, Value>) -> Self {
        // Defensive: callers are expected to hand over already-uppercased
        // keys (the database boundary folds once, on read), but folding
        // again here is free and keeps `Row` correct even if a future
        // driver forgets.
        let columns = columns
            .into_iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v))
            .collect();
        Row { columns }
    }

    /// Returns the value for `column`, or `&Value::Null` if absent.
    pub fn get(&self, column: &str) -> &Value {
        self.columns
            .get(column.to_ascii_uppercase().as_str())
            .unwrap_or(&Value::Null)
    }

    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).is_null()
    }
}

/// A forward-only, single-use iterator over [`Row`]s.
///
/// `advance` must be called before the first `current`; `current` is only
/// valid immediately after an `advance` that returned `Ok(true)`.
pub trait RowCursor {
    fn advance(&mut self) -> Result<bool, R2rmlError>;
    fn current(&self) -> &Row;
}

/// A [`RowCursor`] over an in-memory vector of rows, used by
/// [`crate::model::referencing_object_map::ReferencingObjectMap`] to return
/// the collected set of matching parent rows, and by test doubles.
pub struct VecRowCursor {
    rows: Vec<Row>,
    index: Option<usize>,
}

impl VecRowCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        VecRowCursor { rows, index: None }
    }
}

impl RowCursor for VecRowCursor {
    fn advance(&mut self) -> Result<bool, R2rmlError> {
        let next = self.index.map_or(0, |i| i + 1);
        self.index = Some(next);
        Ok(next < self.rows.len())
    }

    fn current(&self) -> &Row {
        let i = self.index.expect("advance() must be called before current()");
        &self.rows[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_form_of_null_is_none() {
        assert!(Value::Null.lexical_form().is_none());
    }

    #[test]
    fn row_lookup_is_case_insensitive() {
        let mut cols = BTreeMap::new();
        cols.insert("EMPNO".to_string(), Value::String("7369".to_string()));
        let row = Row::new(cols);
        assert_eq!(row.get("empno"), &Value::String("7369".to_string()));
        assert_eq!(row.get("EmpNo"), &Value::String("7369".to_string()));
    }

    #[test]
    fn absent_column_is_null() {
        let row = Row::new(BTreeMap::new());
        assert!(row.is_null("MISSING"));
    }

    #[test]
    fn vec_row_cursor_advances_in_order() {
        let mut cols1 = BTreeMap::new();
        cols1.insert("X".to_string(), Value::Integer(1));
        let mut cols2 = BTreeMap::new();
        cols2.insert("X".to_string(), Value::Integer(2));
        let mut cursor = VecRowCursor::new(vec![Row::new(cols1), Row::new(cols2)]);

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.current().get("X"), &Value::Integer(1));
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.current().get("X"), &Value::Integer(2));
        assert!(!cursor.advance().unwrap());
    }
}
