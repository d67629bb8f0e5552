//! The top-level R2RML mapping document: a namespace environment plus the
//! flat arena of triples maps it exclusively owns (§3 invariant 5).

use crate::model::triples_map::TriplesMap;
use crate::term::NamespaceEnv;

pub struct Mapping {
    pub namespaces: NamespaceEnv,
    pub triples_maps: Vec<TriplesMap>,
}

impl Mapping {
    pub fn new(namespaces: NamespaceEnv) -> Self {
        Mapping {
            namespaces,
            triples_maps: Vec::new(),
        }
    }

    /// Holds iff every contained triples map is valid (§8).
    pub fn is_valid(&self) -> bool {
        self.triples_maps.iter().all(TriplesMap::is_valid)
    }

    /// Holds iff every contained triples map satisfies the inside-out
    /// restriction (§4.6).
    pub fn is_valid_inside_out(&self) -> bool {
        self.triples_maps.iter().all(TriplesMap::is_valid_inside_out)
    }

    /// Looks up a triples map's arena index by its mapping-document id,
    /// used by Phase 3 of the parser to resolve `rr:parentTriplesMap`
    /// references once every triples map has been built.
    pub fn find_id(&self, id: &str) -> Option<usize> {
        self.triples_maps.iter().position(|tm| tm.id == id)
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mapping {{")?;
        writeln!(f, "  base: {}", self.namespaces.base)?;
        for (prefix, iri) in self.namespaces.prefixes() {
            writeln!(f, "  prefix {prefix}: {iri}")?;
        }
        for tm in &self.triples_maps {
            writeln!(f, "{tm}")?;
        }
        write!(f, "}}")
    }
}
