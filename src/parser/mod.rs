//! The mapping parser: a two-phase RDF→object-model translator with a
//! deferred-reference resolution pass (§4.1).
//!
//! - [`rdf_reader`] drives `rio_turtle` and fills Phase 1's triple store.
//! - [`triple_store`] is Phase 1's storage and query layer.
//! - [`build`] implements Phase 2 (build) and Phase 3 (resolve).

mod build;
mod rdf_reader;
mod triple_store;

use std::path::Path;

use crate::diagnostics::DiagnosticSink;
use crate::model::mapping::Mapping;
use crate::R2rmlError;

/// Parses the Turtle mapping document at `path` into a [`Mapping`],
/// reporting every recoverable anomaly to `sink` instead of aborting.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    pub fn parse(
        &self,
        path: impl AsRef<Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Mapping, R2rmlError> {
        let (store, namespaces) = rdf_reader::read_file(path.as_ref(), sink)?;
        Ok(build::build(&store, namespaces, sink))
    }
}
