//! RDF writer interface (external collaborator, §6) plus two concrete
//! serializers built on `rio_api`'s formatter traits, the same crate the
//! core uses for reading Turtle.

use std::io::Write;

use rio_api::formatter::TriplesFormatter;
use rio_api::model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use rio_turtle::{NTriplesFormatter, TurtleFormatter};

use crate::term::{NamespaceEnv, Node};
use crate::R2rmlError;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A sink for generated statements; owns its output and is finished once
/// generation completes.
pub trait RdfWriter {
    fn write_statement(
        &mut self,
        subject: &Node,
        predicate: &Node,
        object: &Node,
    ) -> Result<(), R2rmlError>;

    fn finish(&mut self) -> Result<(), R2rmlError>;
}

fn subject_node(node: &Node) -> Option<NamedOrBlankNode<'_>> {
    match node {
        Node::Iri(iri) => Some(NamedOrBlankNode::NamedNode(NamedNode { iri })),
        Node::BlankNode(id) => Some(NamedOrBlankNode::BlankNode(BlankNode { id })),
        Node::Literal { .. } | Node::Null => None,
    }
}

fn predicate_node(node: &Node) -> Option<NamedNode<'_>> {
    match node {
        Node::Iri(iri) => Some(NamedNode { iri }),
        _ => None,
    }
}

fn object_term(node: &Node) -> Option<Term<'_>> {
    match node {
        Node::Iri(iri) => Some(Term::NamedNode(NamedNode { iri })),
        Node::BlankNode(id) => Some(Term::BlankNode(BlankNode { id })),
        Node::Literal {
            lexical,
            datatype,
            language,
        } => {
            let literal = match (datatype, language) {
                (_, Some(lang)) => Literal::LanguageTaggedString {
                    value: lexical,
                    language: lang,
                },
                (Some(dt), None) => Literal::Typed {
                    value: lexical,
                    datatype: NamedNode { iri: dt },
                },
                (None, None) => Literal::Simple { value: lexical },
            };
            Some(Term::Literal(literal))
        }
        Node::Null => None,
    }
}

/// Builds a `rio_api` triple from our node model and hands it to
/// `formatter`. Returns `Ok(())` without writing anything if any position
/// cannot be represented (e.g. a literal subject) — the generator is
/// expected to have already filtered Null nodes; a shape it cannot
/// represent is a defensive no-op rather than a panic.
fn write_triple<F>(formatter: &mut F, subject: &Node, predicate: &Node, object: &Node) -> Result<(), R2rmlError>
where
    F: TriplesFormatter,
    F::Error: std::fmt::Display,
{
    let (Some(subject), Some(predicate), Some(object)) = (
        subject_node(subject),
        predicate_node(predicate),
        object_term(object),
    ) else {
        return Ok(());
    };
    formatter
        .format(&Triple {
            subject,
            predicate,
            object,
        })
        .map_err(|e| R2rmlError::Writer(e.to_string()))
}

/// N-Triples output: one line per statement, no prefix abbreviation.
pub struct NTriplesWriter<W: Write> {
    formatter: NTriplesFormatter<W>,
}

impl<W: Write> NTriplesWriter<W> {
    pub fn new(write: W) -> Self {
        NTriplesWriter {
            formatter: NTriplesFormatter::new(write),
        }
    }
}

impl<W: Write> RdfWriter for NTriplesWriter<W> {
    fn write_statement(&mut self, subject: &Node, predicate: &Node, object: &Node) -> Result<(), R2rmlError> {
        write_triple(&mut self.formatter, subject, predicate, object)
    }

    fn finish(&mut self) -> Result<(), R2rmlError> {
        Ok(())
    }
}

/// Turtle output. Prefix declarations are written up front from the
/// mapping's namespace environment; every triple is still emitted with
/// fully-resolved IRIs (valid Turtle regardless of whether a declared
/// prefix is actually used to abbreviate it).
pub struct TurtleWriter<W: Write> {
    /// `TurtleFormatter::finish` consumes `self` to flush the terminating
    /// ` .` it defers for predicate/object abbreviation, so the formatter
    /// is held behind an `Option` and taken in [`finish`](Self::finish).
    formatter: Option<TurtleFormatter<W>>,
}

impl<W: Write> TurtleWriter<W> {
    pub fn new(mut write: W, namespaces: &NamespaceEnv) -> Result<Self, R2rmlError> {
        for (prefix, iri) in namespaces.prefixes() {
            writeln!(write, "@prefix {prefix}: <{iri}> .")?;
        }
        Ok(TurtleWriter {
            formatter: Some(TurtleFormatter::new(write)),
        })
    }
}

impl<W: Write> RdfWriter for TurtleWriter<W> {
    fn write_statement(&mut self, subject: &Node, predicate: &Node, object: &Node) -> Result<(), R2rmlError> {
        let formatter = self
            .formatter
            .as_mut()
            .expect("write_statement called after finish");
        write_triple(formatter, subject, predicate, object)
    }

    fn finish(&mut self) -> Result<(), R2rmlError> {
        if let Some(formatter) = self.formatter.take() {
            formatter
                .finish()
                .map_err(|e| R2rmlError::Writer(e.to_string()))?;
        }
        Ok(())
    }
}
