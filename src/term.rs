//! RDF term representation and the namespace environment used to resolve
//! compact IRIs during parsing and to emit prefix declarations during
//! serialization.

use std::collections::BTreeMap;

/// The term-type a term map is configured to produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TermType {
    Iri,
    BlankNode,
    Literal,
}

/// A tagged RDF node, with a sentinel [`Node::Null`] meaning "no term",
/// which triggers triple suppression wherever it appears (see the
/// generator's null-propagation rules).
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Iri(String),
    Literal {
        lexical: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    BlankNode(String),
    Null,
}

impl Node {
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn iri(s: impl Into<String>) -> Self {
        Node::Iri(s.into())
    }

    pub fn simple_literal(s: impl Into<String>) -> Self {
        Node::Literal {
            lexical: s.into(),
            datatype: None,
            language: None,
        }
    }
}

/// A custom namespace: a base IRI and a prefix → namespace-IRI table.
///
/// Owned by the [`Mapping`](crate::model::mapping::Mapping) document for
/// its lifetime; read-only once parsing completes (see the concurrency
/// model: the environment is writer-observable for prefix emission but
/// never mutated during generation).
#[derive(Clone, Debug, Default)]
pub struct NamespaceEnv {
    pub base: String,
    prefixes: BTreeMap<String, String>,
}

impl NamespaceEnv {
    pub fn new(base: impl Into<String>) -> Self {
        NamespaceEnv {
            base: base.into(),
            prefixes: BTreeMap::new(),
        }
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = base.into();
    }

    /// Expands a CURIE of the form `prefix:local` against the known
    /// prefix table. Returns `None` if the prefix is unknown or the input
    /// contains no `:`.
    pub fn expand_curie(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        let ns = self.prefixes.get(prefix)?;
        Some(format!("{ns}{local}"))
    }

    /// Iterates declared prefixes in stable (lexical) order, used by
    /// writers to emit `@prefix` declarations.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_curie_resolves_known_prefix() {
        let mut env = NamespaceEnv::new("http://example.com/");
        env.set_prefix("rr", "http://www.w3.org/ns/r2rml#");
        assert_eq!(
            env.expand_curie("rr:column").as_deref(),
            Some("http://www.w3.org/ns/r2rml#column")
        );
    }

    #[test]
    fn expand_curie_unknown_prefix_is_none() {
        let env = NamespaceEnv::new("http://example.com/");
        assert_eq!(env.expand_curie("foo:bar"), None);
    }

    #[test]
    fn null_node_is_null() {
        assert!(Node::Null.is_null());
        assert!(!Node::iri("http://x").is_null());
    }
}
