//! One rule block: a logical table plus a subject map plus a list of
//! predicate-object maps, all sharing a common subject per row.

use crate::model::logical_table::LogicalTable;
use crate::model::predicate_object_map::PredicateObjectMap;
use crate::model::subject_map::SubjectMap;

pub struct TriplesMap {
    /// The IRI or blank-node key from the mapping document.
    pub id: String,
    pub logical_table: Option<LogicalTable>,
    pub subject_map: Option<SubjectMap>,
    pub predicate_object_maps: Vec<PredicateObjectMap>,
}

impl TriplesMap {
    pub fn new(id: impl Into<String>) -> Self {
        TriplesMap {
            id: id.into(),
            logical_table: None,
            subject_map: None,
            predicate_object_maps: Vec::new(),
        }
    }

    /// A valid triples map has a logical table whose required attributes
    /// are set, a subject map whose value-producing component is set, and
    /// every predicate-object map valid (§3 invariant 1).
    pub fn is_valid(&self) -> bool {
        self.logical_table.as_ref().is_some_and(LogicalTable::is_valid)
            && self.subject_map.as_ref().is_some_and(SubjectMap::is_valid)
            && self
                .predicate_object_maps
                .iter()
                .all(PredicateObjectMap::is_valid)
    }

    /// §4.6: inside-out execution disallows any logical table (rows come
    /// from a surrounding SQL context instead) and requires every
    /// predicate-object map to pass its own inside-out restriction.
    pub fn is_valid_inside_out(&self) -> bool {
        self.logical_table.is_none()
            && self.subject_map.as_ref().is_some_and(SubjectMap::is_valid)
            && self
                .predicate_object_maps
                .iter()
                .all(PredicateObjectMap::is_valid_inside_out)
    }
}

impl std::fmt::Display for TriplesMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TriplesMap <{}> {{", self.id)?;
        write!(f, "  logicalTable: ")?;
        match &self.logical_table {
            Some(lt) => writeln!(f, "{lt}")?,
            None => writeln!(f, "(none)")?,
        }
        write!(f, "  subjectMap: ")?;
        match &self.subject_map {
            Some(sm) => writeln!(f, "{sm}")?,
            None => writeln!(f, "(none)")?,
        }
        for (i, pom) in self.predicate_object_maps.iter().enumerate() {
            writeln!(f, "  predicateObjectMap[{i}]: {pom}")?;
        }
        write!(f, "}}")
    }
}
