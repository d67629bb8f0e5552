//! The subject map: a term map extended with class-IRI assertions and
//! (parsed-only) graph maps.

use crate::model::term_map::TermMap;
use crate::term::{NamespaceEnv, Node};
use crate::value::Row;

/// A term map extended with a list of `rr:class` IRIs and a list of graph
/// maps. Graph maps are parsed but never evaluated by the core.
pub struct SubjectMap {
    pub value: TermMap,
    pub class_iris: Vec<String>,
    pub graph_maps: Vec<TermMap>,
}

impl SubjectMap {
    pub fn new(value: TermMap) -> Self {
        SubjectMap {
            value,
            class_iris: Vec::new(),
            graph_maps: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_valid()
    }

    pub fn evaluate(&self, row: &Row, env: &NamespaceEnv) -> Node {
        self.value.evaluate(row, env)
    }
}

impl std::fmt::Display for SubjectMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SubjectMap {{ {:?}", self.value.kind)?;
        if !self.class_iris.is_empty() {
            write!(f, " classes={:?}", self.class_iris)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::term_map::TermMap;
    use crate::term::TermType;
    use std::collections::BTreeMap;

    #[test]
    fn valid_subject_map_requires_valid_value() {
        let sm = SubjectMap::new(TermMap::template(
            "http://data.example.com/employee/{EMPNO}",
            TermType::Iri,
        ));
        assert!(sm.is_valid());

        let invalid = SubjectMap::new(TermMap::template("", TermType::Iri));
        assert!(!invalid.is_valid());
    }

    #[test]
    fn evaluate_delegates_to_value_term_map() {
        let mut cols = BTreeMap::new();
        cols.insert("EMPNO".to_string(), crate::value::Value::String("7369".to_string()));
        let row = Row::new(cols);
        let env = NamespaceEnv::default();
        let sm = SubjectMap::new(TermMap::template(
            "http://data.example.com/employee/{EMPNO}",
            TermType::Iri,
        ));
        assert_eq!(
            sm.evaluate(&row, &env),
            Node::iri("http://data.example.com/employee/7369")
        );
    }
}
