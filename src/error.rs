//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the library to an embedder.
///
/// Parse-time anomalies are *not* represented here — they are recoverable
/// and reported through a [`DiagnosticSink`](crate::diagnostics::DiagnosticSink)
/// instead, per the parser's failure contract. This type covers the
/// generation-time and I/O failures that propagate and unwind.
#[derive(Debug, Error)]
pub enum R2rmlError {
    #[error("database error: {0}")]
    Db(String),

    #[error("could not read mapping document: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse mapping document: {0}")]
    Turtle(String),

    #[error("could not write RDF output: {0}")]
    Writer(String),

    #[error("mapping is invalid, refusing to generate")]
    InvalidMapping,
}
