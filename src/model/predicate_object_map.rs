//! A bundle of predicate term maps and object term maps, expanded
//! combinatorially per row.

use crate::model::referencing_object_map::ReferencingObjectMap;
use crate::model::term_map::TermMap;

/// An object map slot: either a plain term map, or a referencing object
/// map that joins against a parent triples map. Tagged explicitly (rather
/// than downcast) so the generator's inner loop can branch on the shape
/// without runtime type inspection.
pub enum ObjectMapKind {
    Plain(TermMap),
    Referencing(ReferencingObjectMap),
}

impl ObjectMapKind {
    pub fn is_valid(&self) -> bool {
        match self {
            ObjectMapKind::Plain(tm) => tm.is_valid(),
            ObjectMapKind::Referencing(rom) => rom.is_valid(),
        }
    }

    fn is_referencing(&self) -> bool {
        matches!(self, ObjectMapKind::Referencing(_))
    }
}

/// Holds a non-empty list of predicate term maps, a non-empty list of
/// object term maps, and an optional list of (parsed-only) graph maps.
pub struct PredicateObjectMap {
    pub predicate_maps: Vec<TermMap>,
    pub object_maps: Vec<ObjectMapKind>,
    pub graph_maps: Vec<TermMap>,
}

impl PredicateObjectMap {
    pub fn new() -> Self {
        PredicateObjectMap {
            predicate_maps: Vec::new(),
            object_maps: Vec::new(),
            graph_maps: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.predicate_maps.is_empty()
            && !self.object_maps.is_empty()
            && self.predicate_maps.iter().all(TermMap::is_valid)
            && self.object_maps.iter().all(ObjectMapKind::is_valid)
    }

    /// §4.6's inside-out restriction: no object map may be a referencing
    /// object map (and therefore no join conditions may exist).
    pub fn is_valid_inside_out(&self) -> bool {
        !self.predicate_maps.is_empty()
            && !self.object_maps.is_empty()
            && self.predicate_maps.iter().all(TermMap::is_valid)
            && self
                .object_maps
                .iter()
                .all(|om| om.is_valid() && !om.is_referencing())
    }
}

impl Default for PredicateObjectMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PredicateObjectMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PredicateObjectMap {{ predicates=[")?;
        for (i, pm) in self.predicate_maps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", pm.kind)?;
        }
        write!(f, "] objects=[")?;
        for (i, om) in self.object_maps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match om {
                ObjectMapKind::Plain(tm) => write!(f, "{:?}", tm.kind)?,
                ObjectMapKind::Referencing(rom) => write!(f, "{rom}")?,
            }
        }
        write!(f, "] }}")
    }
}
