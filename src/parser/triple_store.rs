//! Phase 1's raw triple store: a map from subject key to predicate IRI to
//! an ordered list of objects, plus the query helpers used throughout
//! Phase 2.

use std::collections::BTreeMap;

/// The RDF node kind of a collected object value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjKind {
    Uri,
    Blank,
    Literal,
}

/// One collected object, retaining its datatype/language annotations when
/// it is a literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjValue {
    pub kind: ObjKind,
    pub value: String,
    pub datatype: Option<String>,
    pub lang: Option<String>,
}

impl ObjValue {
    pub fn uri(value: impl Into<String>) -> Self {
        ObjValue {
            kind: ObjKind::Uri,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn blank(id: impl Into<String>) -> Self {
        ObjValue {
            kind: ObjKind::Blank,
            value: id.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(
        value: impl Into<String>,
        datatype: Option<String>,
        lang: Option<String>,
    ) -> Self {
        ObjValue {
            kind: ObjKind::Literal,
            value: value.into(),
            datatype,
            lang,
        }
    }

    /// The canonical lookup key for this value when used as a subject:
    /// `"_:" + id` for blank nodes, the URI itself for named nodes, `None`
    /// for literals (literals are never triples-map or map-node subjects).
    pub fn node_key(&self) -> Option<String> {
        match self.kind {
            ObjKind::Blank => Some(format!("_:{}", self.value)),
            ObjKind::Uri => Some(self.value.clone()),
            ObjKind::Literal => None,
        }
    }
}

pub type PredMap = BTreeMap<String, Vec<ObjValue>>;
pub type TripleStore = BTreeMap<String, PredMap>;

/// Records one collected triple.
pub fn insert(store: &mut TripleStore, subject_key: String, predicate_key: String, obj: ObjValue) {
    store
        .entry(subject_key)
        .or_default()
        .entry(predicate_key)
        .or_default()
        .push(obj);
}

pub fn get_objects<'a>(store: &'a TripleStore, subj: &str, pred: &str) -> Option<&'a [ObjValue]> {
    store.get(subj)?.get(pred).map(Vec::as_slice)
}

pub fn first_literal(store: &TripleStore, subj: &str, pred: &str) -> Option<String> {
    get_objects(store, subj, pred)?
        .iter()
        .find(|o| o.kind == ObjKind::Literal)
        .map(|o| o.value.clone())
}

pub fn first_uri(store: &TripleStore, subj: &str, pred: &str) -> Option<String> {
    get_objects(store, subj, pred)?
        .iter()
        .find(|o| o.kind == ObjKind::Uri)
        .map(|o| o.value.clone())
}

/// The node-lookup key of the first object of `pred`, if any.
pub fn first_object_key(store: &TripleStore, subj: &str, pred: &str) -> Option<String> {
    get_objects(store, subj, pred)?.first()?.node_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_literal_skips_non_literal_objects() {
        let mut store = TripleStore::new();
        insert(&mut store, "s".into(), "p".into(), ObjValue::uri("http://x"));
        insert(
            &mut store,
            "s".into(),
            "p".into(),
            ObjValue::literal("hello", None, None),
        );
        assert_eq!(first_literal(&store, "s", "p").as_deref(), Some("hello"));
    }

    #[test]
    fn first_uri_returns_none_when_absent() {
        let store = TripleStore::new();
        assert_eq!(first_uri(&store, "s", "p"), None);
    }

    #[test]
    fn blank_node_key_is_prefixed() {
        let obj = ObjValue::blank("b0");
        assert_eq!(obj.node_key().as_deref(), Some("_:b0"));
    }

    #[test]
    fn literal_has_no_node_key() {
        let obj = ObjValue::literal("x", None, None);
        assert_eq!(obj.node_key(), None);
    }
}
