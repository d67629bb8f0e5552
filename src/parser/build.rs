//! Phase 2 (build) and Phase 3 (resolve) of the parser: walks the Phase 1
//! triple store and constructs the typed object model, then resolves
//! `rr:parentTriplesMap` back-references.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::model::logical_table::LogicalTable;
use crate::model::mapping::Mapping;
use crate::model::predicate_object_map::{ObjectMapKind, PredicateObjectMap};
use crate::model::referencing_object_map::{JoinCondition, ReferencingObjectMap};
use crate::model::subject_map::SubjectMap;
use crate::model::term_map::TermMap;
use crate::model::triples_map::TriplesMap;
use crate::parser::triple_store::{self, ObjKind, TripleStore};
use crate::term::{NamespaceEnv, Node, TermType};

const RR: &str = "http://www.w3.org/ns/r2rml#";

fn rr(local: &str) -> String {
    format!("{RR}{local}")
}

/// Where a term map occurs, used only to pick its default term type when
/// `rr:termType` is absent (§4.3: IRI for subject/predicate; for object
/// maps, the common R2RML default of Literal for column/template-valued
/// maps and IRI otherwise).
#[derive(Clone, Copy, PartialEq, Eq)]
enum TermMapContext {
    Subject,
    Predicate,
    Object,
}

/// One unresolved `rr:parentTriplesMap` reference, recorded by arena
/// position rather than by pointer: the referencing object map it belongs
/// to is owned by value inside `triples_maps[tm][pom].object_maps[obj]`.
struct DeferredParentRef {
    triples_map_index: usize,
    pom_index: usize,
    object_index: usize,
    parent_iri: String,
}

/// Runs Phase 2 and Phase 3 over a collected triple store, producing a
/// `Mapping`. Reports every recoverable anomaly to `sink` and otherwise
/// keeps going, per the parser's non-aborting failure contract (§4.1/§7).
pub fn build(store: &TripleStore, namespaces: NamespaceEnv, sink: &mut dyn DiagnosticSink) -> Mapping {
    let mut mapping = Mapping::new(namespaces);
    let mut deferred = Vec::new();

    for (subject, preds) in store.iter() {
        if subject.starts_with("_:") {
            continue; // blank-node subjects never become triples maps
        }
        let is_triples_map = preds.contains_key(&rr("logicalTable"))
            || preds.contains_key(&rr("subjectMap"))
            || preds.contains_key(&rr("predicateObjectMap"))
            || preds.contains_key(&rr("subject"));
        if !is_triples_map {
            continue;
        }

        let mut tm = TriplesMap::new(subject.clone());
        let tm_index = mapping.triples_maps.len();

        if let Some(lt_key) = triple_store::first_object_key(store, subject, &rr("logicalTable")) {
            tm.logical_table = build_logical_table(store, &lt_key, sink);
        }

        if let Some(sm_key) = triple_store::first_object_key(store, subject, &rr("subjectMap")) {
            tm.subject_map = Some(build_subject_map(store, &sm_key));
        }

        if let Some(pom_objs) = triple_store::get_objects(store, subject, &rr("predicateObjectMap")) {
            for pom_obj in pom_objs {
                let Some(pom_key) = pom_obj.node_key() else {
                    continue;
                };
                let pom_index = tm.predicate_object_maps.len();
                let pom = build_pom(store, &pom_key, tm_index, pom_index, &mut deferred, sink);
                tm.predicate_object_maps.push(pom);
            }
        }

        mapping.triples_maps.push(tm);
    }

    resolve_deferred(&mut mapping, deferred, sink);
    mapping
}

fn build_logical_table(
    store: &TripleStore,
    lt_key: &str,
    sink: &mut dyn DiagnosticSink,
) -> Option<LogicalTable> {
    if let Some(table_name) = triple_store::first_literal(store, lt_key, &rr("tableName")) {
        return Some(LogicalTable::base_table_or_view(table_name));
    }
    if let Some(sql_query) = triple_store::first_literal(store, lt_key, &rr("sqlQuery")) {
        let mut lt = LogicalTable::r2rml_view(sql_query);
        if let Some(versions) = triple_store::get_objects(store, lt_key, &rr("sqlVersion")) {
            for v in versions {
                if v.kind == ObjKind::Uri {
                    lt.push_sql_version(v.value.clone());
                }
            }
        }
        return Some(lt);
    }
    sink.report(Diagnostic::UnrecognisedLogicalTable {
        node: lt_key.to_string(),
    });
    None
}

fn build_subject_map(store: &TripleStore, sm_key: &str) -> SubjectMap {
    let value = build_value_term_map(store, sm_key, TermMapContext::Subject);
    let mut sm = SubjectMap::new(value);

    if let Some(class_objs) = triple_store::get_objects(store, sm_key, &rr("class")) {
        for c in class_objs {
            if c.kind == ObjKind::Uri {
                sm.class_iris.push(c.value.clone());
            }
        }
    }
    sm.graph_maps = build_graph_maps(store, sm_key);
    sm
}

/// Collects `rr:graph` (constant-IRI shortcut) and `rr:graphMap` (full term
/// map) entries. Parsed only — the generator never evaluates these (§3
/// Non-goals: graph maps are out of scope beyond recognising their
/// presence).
fn build_graph_maps(store: &TripleStore, key: &str) -> Vec<TermMap> {
    let mut graph_maps = Vec::new();
    if let Some(objs) = triple_store::get_objects(store, key, &rr("graph")) {
        for g in objs {
            if g.kind == ObjKind::Uri {
                graph_maps.push(TermMap::constant(Node::iri(g.value.clone()), TermType::Iri));
            }
        }
    }
    if let Some(objs) = triple_store::get_objects(store, key, &rr("graphMap")) {
        for gm in objs {
            let Some(gm_key) = gm.node_key() else { continue };
            graph_maps.push(build_value_term_map(store, &gm_key, TermMapContext::Subject));
        }
    }
    graph_maps
}

/// Builds the value-producing component of a subject map directly,
/// bypassing the generic term-map builder: a subject map's value slot is
/// never a Referencing Object Map (§3), only Template/Column/Constant in
/// priority order.
fn build_value_term_map(store: &TripleStore, key: &str, context: TermMapContext) -> TermMap {
    let kind_and_map = if let Some(tmpl) = triple_store::first_literal(store, key, &rr("template")) {
        Some(TermMap::template(tmpl, TermType::Iri))
    } else if let Some(column) = triple_store::first_literal(store, key, &rr("column")) {
        Some(TermMap::column(column, TermType::Iri))
    } else if let Some(constant) = triple_store::first_uri(store, key, &rr("constant")) {
        Some(TermMap::constant(Node::iri(constant), TermType::Iri))
    } else {
        None
    };

    let mut tm = kind_and_map.unwrap_or_else(|| TermMap::constant(Node::Null, TermType::Iri));
    tm.term_type = resolve_term_type(store, key, context, &tm);
    apply_annotations(store, key, &mut tm);
    tm
}

fn build_pom(
    store: &TripleStore,
    pom_key: &str,
    tm_index: usize,
    pom_index: usize,
    deferred: &mut Vec<DeferredParentRef>,
    sink: &mut dyn DiagnosticSink,
) -> PredicateObjectMap {
    let mut pom = PredicateObjectMap::new();

    // rr:predicate shortcut (constant predicate)
    if let Some(objs) = triple_store::get_objects(store, pom_key, &rr("predicate")) {
        for p in objs {
            if p.kind == ObjKind::Uri {
                pom.predicate_maps
                    .push(TermMap::constant(Node::iri(p.value.clone()), TermType::Iri));
            }
        }
    }

    // rr:predicateMap (full predicate map; never a Referencing Object Map)
    if let Some(objs) = triple_store::get_objects(store, pom_key, &rr("predicateMap")) {
        for pm in objs {
            let Some(pm_key) = pm.node_key() else { continue };
            pom.predicate_maps
                .push(build_value_term_map(store, &pm_key, TermMapContext::Predicate));
        }
    }

    // rr:object shortcut (constant URI object)
    if let Some(objs) = triple_store::get_objects(store, pom_key, &rr("object")) {
        for o in objs {
            if o.kind == ObjKind::Uri {
                pom.object_maps.push(ObjectMapKind::Plain(TermMap::constant(
                    Node::iri(o.value.clone()),
                    TermType::Iri,
                )));
            }
        }
    }

    // rr:objectMap (full object map; may be a Referencing Object Map)
    if let Some(objs) = triple_store::get_objects(store, pom_key, &rr("objectMap")) {
        for om in objs {
            let Some(om_key) = om.node_key() else { continue };
            let object_index = pom.object_maps.len();
            match build_object_map(store, &om_key) {
                Some(ObjectMapBuildResult::Plain(tm)) => {
                    pom.object_maps.push(ObjectMapKind::Plain(tm));
                }
                Some(ObjectMapBuildResult::Referencing(rom, parent_iri)) => {
                    pom.object_maps.push(ObjectMapKind::Referencing(rom));
                    deferred.push(DeferredParentRef {
                        triples_map_index: tm_index,
                        pom_index,
                        object_index,
                        parent_iri,
                    });
                }
                None => {
                    sink.report(Diagnostic::UnknownObjectMapShape {
                        node: om_key.clone(),
                    });
                }
            }
        }
    }

    pom.graph_maps = build_graph_maps(store, pom_key);
    pom
}

enum ObjectMapBuildResult {
    Plain(TermMap),
    Referencing(ReferencingObjectMap, String),
}

/// The generic term-map builder of §4.1, specialised to the object-map
/// position where `rr:parentTriplesMap` is meaningful.
fn build_object_map(store: &TripleStore, node_key: &str) -> Option<ObjectMapBuildResult> {
    if let Some(column) = triple_store::first_literal(store, node_key, &rr("column")) {
        let mut tm = TermMap::column(column, TermType::Literal);
        tm.term_type = resolve_term_type(store, node_key, TermMapContext::Object, &tm);
        apply_annotations(store, node_key, &mut tm);
        return Some(ObjectMapBuildResult::Plain(tm));
    }
    if let Some(tmpl) = triple_store::first_literal(store, node_key, &rr("template")) {
        let mut tm = TermMap::template(tmpl, TermType::Iri);
        tm.term_type = resolve_term_type(store, node_key, TermMapContext::Object, &tm);
        apply_annotations(store, node_key, &mut tm);
        return Some(ObjectMapBuildResult::Plain(tm));
    }
    if let Some(constant) = triple_store::first_uri(store, node_key, &rr("constant")) {
        let mut tm = TermMap::constant(Node::iri(constant), TermType::Iri);
        tm.term_type = resolve_term_type(store, node_key, TermMapContext::Object, &tm);
        apply_annotations(store, node_key, &mut tm);
        return Some(ObjectMapBuildResult::Plain(tm));
    }
    if let Some(parent_iri) = triple_store::first_uri(store, node_key, &rr("parentTriplesMap")) {
        let mut rom = ReferencingObjectMap::new(None);
        if let Some(jc_objs) = triple_store::get_objects(store, node_key, &rr("joinCondition")) {
            for jc in jc_objs {
                let Some(jc_key) = jc.node_key() else { continue };
                let child = triple_store::first_literal(store, &jc_key, &rr("child"));
                let parent = triple_store::first_literal(store, &jc_key, &rr("parent"));
                if let (Some(child), Some(parent)) = (child, parent) {
                    rom.join_conditions.push(JoinCondition::new(child, parent));
                }
            }
        }
        return Some(ObjectMapBuildResult::Referencing(rom, parent_iri));
    }
    None
}

/// `rr:termType` is an IRI-valued property pointing to `rr:IRI`,
/// `rr:BlankNode`, or `rr:Literal`. Absent, the default follows §4.3:
/// IRI for subject/predicate position; for object position, Literal only
/// for a column-valued map (the common case of a literal cell) and IRI
/// for a constant- or template-valued map (a template always produces an
/// IRI unless overridden).
fn resolve_term_type(
    store: &TripleStore,
    key: &str,
    context: TermMapContext,
    tm: &TermMap,
) -> TermType {
    if let Some(explicit) = triple_store::first_uri(store, key, &rr("termType")) {
        if explicit == rr("IRI") {
            return TermType::Iri;
        }
        if explicit == rr("BlankNode") {
            return TermType::BlankNode;
        }
        if explicit == rr("Literal") {
            return TermType::Literal;
        }
    }

    match context {
        TermMapContext::Subject | TermMapContext::Predicate => TermType::Iri,
        TermMapContext::Object => match &tm.kind {
            crate::model::term_map::TermMapKind::Column(_) => TermType::Literal,
            _ => TermType::Iri,
        },
    }
}

fn apply_annotations(store: &TripleStore, key: &str, tm: &mut TermMap) {
    tm.language = triple_store::first_literal(store, key, &rr("language"));
    tm.datatype = triple_store::first_uri(store, key, &rr("datatype"));
    tm.inverse_expression = triple_store::first_literal(store, key, &rr("inverseExpression"));
}

fn resolve_deferred(mapping: &mut Mapping, deferred: Vec<DeferredParentRef>, sink: &mut dyn DiagnosticSink) {
    for reference in deferred {
        let resolved = mapping.find_id(&reference.parent_iri);
        if resolved.is_none() {
            sink.report(Diagnostic::UnresolvedParentTriplesMap {
                parent_iri: reference.parent_iri.clone(),
            });
        }
        if let ObjectMapKind::Referencing(rom) = &mut mapping.triples_maps[reference.triples_map_index]
            .predicate_object_maps[reference.pom_index]
            .object_maps[reference.object_index]
        {
            rom.parent = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::parser::triple_store::{self as ts, ObjValue};

    fn uri_triple(store: &mut TripleStore, s: &str, p: &str, o: &str) {
        ts::insert(store, s.to_string(), p.to_string(), ObjValue::uri(o));
    }

    fn literal_triple(store: &mut TripleStore, s: &str, p: &str, v: &str) {
        ts::insert(store, s.to_string(), p.to_string(), ObjValue::literal(v, None, None));
    }

    #[test]
    fn promotes_named_resource_with_logical_table_predicate() {
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("logicalTable"), "_:lt0");
        literal_triple(&mut store, "_:lt0", &rr("tableName"), "EMP");
        literal_triple(
            &mut store,
            "http://ex/Emp",
            &rr("nonR2rmlPredicate"),
            "ignored",
        );

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        assert_eq!(mapping.triples_maps.len(), 1);
        assert_eq!(mapping.triples_maps[0].id, "http://ex/Emp");
        assert!(mapping.triples_maps[0].logical_table.is_some());
    }

    #[test]
    fn blank_node_subject_is_never_promoted() {
        let mut store = TripleStore::new();
        uri_triple(&mut store, "_:b0", &rr("logicalTable"), "_:lt0");
        literal_triple(&mut store, "_:lt0", &rr("tableName"), "EMP");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        assert!(mapping.triples_maps.is_empty());
    }

    #[test]
    fn malformed_logical_table_predicate_is_recognised_as_invalid() {
        // `rr:table` (wrong predicate name) instead of `rr:logicalTable`.
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("subjectMap"), "_:sm0");
        literal_triple(&mut store, "_:sm0", &rr("template"), "http://ex/{ID}");
        uri_triple(&mut store, "http://ex/Emp", &rr("table"), "_:lt0");
        literal_triple(&mut store, "_:lt0", &rr("tableName"), "EMP");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        let tm = &mapping.triples_maps[0];
        assert!(tm.logical_table.is_none());
        assert!(!tm.is_valid());
    }

    #[test]
    fn unresolved_parent_triples_map_clears_reference_and_reports() {
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("predicateObjectMap"), "_:pom0");
        uri_triple(&mut store, "_:pom0", &rr("predicate"), "http://ex/dept");
        uri_triple(&mut store, "_:pom0", &rr("objectMap"), "_:om0");
        uri_triple(&mut store, "_:om0", &rr("parentTriplesMap"), "http://ex/MissingDept");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        let ObjectMapKind::Referencing(rom) = &mapping.triples_maps[0].predicate_object_maps[0].object_maps[0]
        else {
            panic!("expected a referencing object map");
        };
        assert_eq!(rom.parent, None);
        assert_eq!(sink.diagnostics.len(), 1);
    }

    #[test]
    fn silently_drops_wrong_kind_predicate_value() {
        // rr:predicate expects a URI; a literal is silently dropped.
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("predicateObjectMap"), "_:pom0");
        literal_triple(&mut store, "_:pom0", &rr("predicate"), "not-a-uri");
        uri_triple(&mut store, "_:pom0", &rr("object"), "http://ex/x");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        assert!(mapping.triples_maps[0].predicate_object_maps[0]
            .predicate_maps
            .is_empty());
    }

    #[test]
    fn graph_maps_are_parsed_but_not_validated_against() {
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("subjectMap"), "_:sm0");
        literal_triple(&mut store, "_:sm0", &rr("template"), "http://ex/{ID}");
        uri_triple(&mut store, "_:sm0", &rr("graph"), "http://ex/graphs/emp");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        let sm = mapping.triples_maps[0].subject_map.as_ref().unwrap();
        assert_eq!(sm.graph_maps.len(), 1);
        assert!(sm.is_valid()); // graph maps never affect validity
    }

    #[test]
    fn object_map_default_term_type_is_literal_for_column() {
        let mut store = TripleStore::new();
        uri_triple(&mut store, "http://ex/Emp", &rr("predicateObjectMap"), "_:pom0");
        uri_triple(&mut store, "_:pom0", &rr("predicate"), "http://ex/name");
        uri_triple(&mut store, "_:pom0", &rr("objectMap"), "_:om0");
        literal_triple(&mut store, "_:om0", &rr("column"), "ENAME");

        let mut sink = CollectingSink::default();
        let mapping = build(&store, NamespaceEnv::default(), &mut sink);
        let ObjectMapKind::Plain(tm) = &mapping.triples_maps[0].predicate_object_maps[0].object_maps[0]
        else {
            panic!("expected a plain term map");
        };
        assert_eq!(tm.term_type, TermType::Literal);
    }
}
