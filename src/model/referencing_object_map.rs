//! A term map that produces, as its object term, the subject generated by
//! another ("parent") triples map, joined by column equality.

use crate::db::SqlConnection;
use crate::model::mapping::Mapping;
use crate::model::TriplesMapId;
use crate::term::{NamespaceEnv, Node};
use crate::value::{Row, RowCursor, VecRowCursor};
use crate::R2rmlError;

/// A `(childColumn, parentColumn)` pair; the join holds for a given
/// `(childRow, parentRow)` pair iff neither side is null and their
/// string forms are equal byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinCondition {
    pub child_column: String,
    pub parent_column: String,
}

impl JoinCondition {
    pub fn new(child_column: impl Into<String>, parent_column: impl Into<String>) -> Self {
        JoinCondition {
            child_column: child_column.into(),
            parent_column: parent_column.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.child_column.is_empty() && !self.parent_column.is_empty()
    }

    fn holds(&self, child_row: &Row, parent_row: &Row) -> bool {
        let child_val = child_row.get(&self.child_column);
        let parent_val = parent_row.get(&self.parent_column);
        match (child_val.lexical_form(), parent_val.lexical_form()) {
            (Some(c), Some(p)) => c == p,
            _ => false,
        }
    }
}

/// Holds a (late-resolved) non-owning reference to a parent triples map,
/// modeled as an arena index into [`Mapping::triples_maps`] rather than a
/// raw pointer — an arena-plus-index avoids a cyclic ownership graph
/// entirely.
pub struct ReferencingObjectMap {
    pub parent: Option<TriplesMapId>,
    pub join_conditions: Vec<JoinCondition>,
}

impl ReferencingObjectMap {
    pub fn new(parent: Option<TriplesMapId>) -> Self {
        ReferencingObjectMap {
            parent,
            join_conditions: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.parent.is_some() && self.join_conditions.iter().all(JoinCondition::is_valid)
    }

    /// Opens the parent's logical table and collects every parent row for
    /// which every join condition holds against `child_row` (§4.4). With
    /// zero join conditions every parent row matches — the Cartesian
    /// product edge case of §8.
    pub fn get_joined_rows(
        &self,
        conn: &dyn SqlConnection,
        child_row: &Row,
        mapping: &Mapping,
    ) -> Result<Box<dyn RowCursor>, R2rmlError> {
        let Some(parent_id) = self.parent else {
            return Ok(Box::new(VecRowCursor::new(Vec::new())));
        };
        let parent_tm = &mapping.triples_maps[parent_id];
        let Some(parent_logical_table) = &parent_tm.logical_table else {
            return Ok(Box::new(VecRowCursor::new(Vec::new())));
        };

        let mut parent_cursor = parent_logical_table.get_rows(conn)?;
        let mut matched = Vec::new();
        while parent_cursor.advance()? {
            let parent_row = parent_cursor.current();
            if self
                .join_conditions
                .iter()
                .all(|jc| jc.holds(child_row, parent_row))
            {
                matched.push(parent_row.clone());
            }
        }
        Ok(Box::new(VecRowCursor::new(matched)))
    }

    /// Two-row term generation: delegates to the parent triples map's
    /// subject map, evaluated against `parent_row`.
    pub fn generate_object_term(
        &self,
        parent_row: &Row,
        mapping: &Mapping,
        env: &NamespaceEnv,
    ) -> Node {
        let Some(parent_id) = self.parent else {
            return Node::Null;
        };
        match &mapping.triples_maps[parent_id].subject_map {
            Some(sm) => sm.evaluate(parent_row, env),
            None => Node::Null,
        }
    }
}

impl std::fmt::Display for ReferencingObjectMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReferencingObjectMap {{ parent=")?;
        match self.parent {
            Some(id) => write!(f, "#{id}")?,
            None => write!(f, "(unresolved)")?,
        }
        if !self.join_conditions.is_empty() {
            write!(f, " joins=[")?;
            for (i, jc) in self.join_conditions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", jc.child_column, jc.parent_column)?;
            }
            write!(f, "]")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::logical_table::LogicalTable;
    use crate::model::subject_map::SubjectMap;
    use crate::model::term_map::TermMap;
    use crate::model::triples_map::TriplesMap;
    use crate::term::TermType;
    use std::collections::BTreeMap;

    fn row_with(column: &str, value: &str) -> Row {
        let mut cols = BTreeMap::new();
        cols.insert(
            column.to_string(),
            crate::value::Value::String(value.to_string()),
        );
        Row::new(cols)
    }

    #[test]
    fn join_condition_holds_requires_non_null_equal_strings() {
        let jc = JoinCondition::new("DEPTNO", "DEPTNO");
        let child = row_with("DEPTNO", "10");
        let parent = row_with("DEPTNO", "10");
        assert!(jc.holds(&child, &parent));

        let mismatched = row_with("DEPTNO", "20");
        assert!(!jc.holds(&child, &mismatched));

        let empty = Row::new(BTreeMap::new());
        assert!(!jc.holds(&empty, &parent));
    }

    #[test]
    fn unresolved_parent_is_invalid() {
        let rom = ReferencingObjectMap::new(None);
        assert!(!rom.is_valid());
    }

    #[test]
    fn generate_object_term_uses_parent_subject_map() {
        let parent_tm = TriplesMap {
            id: "http://example.com/Dept".to_string(),
            logical_table: Some(LogicalTable::base_table_or_view("DEPT")),
            subject_map: Some(SubjectMap::new(TermMap::template(
                "http://data.example.com/department/{DEPTNO}",
                TermType::Iri,
            ))),
            predicate_object_maps: Vec::new(),
        };
        let mapping = Mapping {
            namespaces: NamespaceEnv::default(),
            triples_maps: vec![parent_tm],
        };
        let rom = ReferencingObjectMap::new(Some(0));
        let parent_row = row_with("DEPTNO", "10");
        let env = NamespaceEnv::default();
        assert_eq!(
            rom.generate_object_term(&parent_row, &mapping, &env),
            Node::iri("http://data.example.com/department/10")
        );
    }
}
