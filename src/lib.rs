//! An R2RML toolkit: maps rows of a relational database into RDF triples
//! according to a declarative [R2RML](https://www.w3.org/TR/r2rml/) mapping
//! document.
//!
//! The crate is organised around three tightly coupled subsystems:
//!
//! * [`parser`] — a two-phase translator from a generic RDF triple stream
//!   into the typed object model in [`model`], including late resolution
//!   of cross-references between triples maps;
//! * [`model::term_map`] — the per-row logic that produces RDF terms from
//!   constant, column, and template-based term maps;
//! * [`generator`] — the driver that iterates logical-table row sources and
//!   emits triples, including referencing-object-map joins.
//!
//! # Example
//!
//! ```no_run
//! use r2rml::db::sqlite::SqliteConnection;
//! use r2rml::diagnostics::TracingSink;
//! use r2rml::generator::{writer::NTriplesWriter, Generator};
//! use r2rml::parser::Parser;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut sink = TracingSink::default();
//! let mapping = Parser::new().parse("mapping.ttl", &mut sink)?;
//! let conn = SqliteConnection::open("database.sqlite")?;
//! let mut writer = NTriplesWriter::new(std::io::stdout());
//! Generator::new().generate(&mapping, &conn, &mut writer)?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod term;
pub mod value;

pub use error::R2rmlError;
pub use model::mapping::Mapping;
