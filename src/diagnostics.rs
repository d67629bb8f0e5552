//! The write-only diagnostic stream parse anomalies are reported through.
//!
//! The parser never aborts on a malformed mapping (§4.1's failure
//! contract); instead every anomaly is reported here and the parser
//! continues with the best-effort object model. See §7 for the full
//! taxonomy this module's [`Diagnostic`] variants mirror.

use std::fmt;

/// One parse-time anomaly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The RDF reader reported a syntax error; `line`/`col` are best-effort.
    Syntax { message: String },
    /// A logical table node had neither `rr:tableName` nor `rr:sqlQuery`.
    UnrecognisedLogicalTable { node: String },
    /// A node-typed map slot (`rr:objectMap`, `rr:predicateMap`, ...) had
    /// none of `rr:column` / `rr:template` / `rr:constant` / `rr:parentTriplesMap`.
    UnknownObjectMapShape { node: String },
    /// An `rr:parentTriplesMap` IRI did not match any parsed triples map.
    UnresolvedParentTriplesMap { parent_iri: String },
    /// Could not build a file URI / open the mapping document.
    CouldNotOpenDocument { path: String, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Syntax { message } => write!(f, "syntax error: {message}"),
            Diagnostic::UnrecognisedLogicalTable { node } => {
                write!(f, "unrecognised logical table <{node}>")
            }
            Diagnostic::UnknownObjectMapShape { node } => {
                write!(f, "unknown object map shape for <{node}>")
            }
            Diagnostic::UnresolvedParentTriplesMap { parent_iri } => {
                write!(f, "unresolved parentTriplesMap <{parent_iri}>")
            }
            Diagnostic::CouldNotOpenDocument { path, message } => {
                write!(f, "could not open mapping document {path}: {message}")
            }
        }
    }
}

/// A write-only stream receiving [`Diagnostic`]s as they are produced.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects every diagnostic into a `Vec`, for tests and for callers that
/// want to inspect the full list after parsing.
#[derive(Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Emits every diagnostic as a `tracing::warn!` event, for the CLI and any
/// embedder that already has `tracing` wired up.
#[derive(Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "R2RML parser anomaly");
    }
}

/// Fans a diagnostic out to two sinks at once — used by the CLI to both
/// collect diagnostics (for `--dump-mapping`) and log them live.
pub struct TeeSink<'a> {
    pub a: &'a mut dyn DiagnosticSink,
    pub b: &'a mut dyn DiagnosticSink,
}

impl DiagnosticSink for TeeSink<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.a.report(diagnostic.clone());
        self.b.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_preserves_order() {
        let mut sink = CollectingSink::default();
        sink.report(Diagnostic::UnrecognisedLogicalTable {
            node: "_:lt1".to_string(),
        });
        sink.report(Diagnostic::UnresolvedParentTriplesMap {
            parent_iri: "http://example.com/Dept".to_string(),
        });
        assert_eq!(sink.diagnostics.len(), 2);
        assert_eq!(
            sink.diagnostics[0],
            Diagnostic::UnrecognisedLogicalTable {
                node: "_:lt1".to_string()
            }
        );
    }
}
