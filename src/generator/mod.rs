//! The triple generation pipeline (§4.5): iterates every valid triples
//! map's row cursor, generates the subject, emits class assertions, then
//! delegates to each predicate-object map.

pub mod writer;

use crate::db::SqlConnection;
use crate::model::mapping::Mapping;
use crate::model::predicate_object_map::ObjectMapKind;
use crate::model::triples_map::TriplesMap;
use crate::term::Node;
use crate::value::Row;
use crate::R2rmlError;
use writer::{RdfWriter, RDF_TYPE};

/// Row-by-row driver that emits statements into an [`RdfWriter`] sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Generator
    }

    /// Walks every triples map in document order, opening its logical
    /// table and processing each row in cursor order (§4.5's ordering
    /// guarantees). Invalid triples maps are skipped entirely.
    pub fn generate(
        &self,
        mapping: &Mapping,
        conn: &dyn SqlConnection,
        writer: &mut dyn RdfWriter,
    ) -> Result<(), R2rmlError> {
        for tm in &mapping.triples_maps {
            if !tm.is_valid() {
                continue;
            }
            let logical_table = tm
                .logical_table
                .as_ref()
                .expect("TriplesMap::is_valid() guarantees a logical table");
            let mut cursor = logical_table.get_rows(conn)?;
            while cursor.advance()? {
                self.generate_row(tm, cursor.current(), mapping, conn, writer)?;
            }
        }
        writer.finish()
    }

    fn generate_row(
        &self,
        tm: &TriplesMap,
        row: &Row,
        mapping: &Mapping,
        conn: &dyn SqlConnection,
        writer: &mut dyn RdfWriter,
    ) -> Result<(), R2rmlError> {
        let subject_map = tm
            .subject_map
            .as_ref()
            .expect("TriplesMap::is_valid() guarantees a subject map");
        let subject = subject_map.evaluate(row, &mapping.namespaces);
        if subject.is_null() {
            return Ok(()); // null subject: skip the row entirely
        }

        let rdf_type = Node::iri(RDF_TYPE);
        for class_iri in &subject_map.class_iris {
            writer.write_statement(&subject, &rdf_type, &Node::iri(class_iri.clone()))?;
        }

        for pom in &tm.predicate_object_maps {
            for predicate_map in &pom.predicate_maps {
                let predicate = predicate_map.evaluate(row, &mapping.namespaces);
                if predicate.is_null() {
                    continue; // null predicate: skip this predicate map
                }
                for object_map in &pom.object_maps {
                    self.emit_object(&subject, &predicate, object_map, row, mapping, conn, writer)?;
                }
            }
        }
        Ok(())
    }

    fn emit_object(
        &self,
        subject: &Node,
        predicate: &Node,
        object_map: &ObjectMapKind,
        row: &Row,
        mapping: &Mapping,
        conn: &dyn SqlConnection,
        writer: &mut dyn RdfWriter,
    ) -> Result<(), R2rmlError> {
        match object_map {
            ObjectMapKind::Plain(term_map) => {
                let object = term_map.evaluate(row, &mapping.namespaces);
                if object.is_null() {
                    return Ok(());
                }
                writer.write_statement(subject, predicate, &object)
            }
            ObjectMapKind::Referencing(rom) => {
                let mut joined = rom.get_joined_rows(conn, row, mapping)?;
                while joined.advance()? {
                    let parent_row = joined.current();
                    let object = rom.generate_object_term(parent_row, mapping, &mapping.namespaces);
                    if object.is_null() {
                        continue;
                    }
                    writer.write_statement(subject, predicate, &object)?;
                }
                Ok(())
            }
        }
    }
}
