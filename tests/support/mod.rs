//! Shared fixtures for the integration tests: a Turtle mapping document
//! written to a temp file and parsed, plus an in-memory SQLite database
//! seeded from a setup script.

use std::io::Write;

use r2rml::db::sqlite::SqliteConnection;
use r2rml::diagnostics::CollectingSink;
use r2rml::parser::Parser;
use r2rml::Mapping;

pub fn parse_mapping(turtle: &str) -> (Mapping, CollectingSink) {
    let mut file = tempfile::Builder::new()
        .suffix(".ttl")
        .tempfile()
        .expect("create temp mapping file");
    file.write_all(turtle.as_bytes()).expect("write mapping");
    file.flush().expect("flush mapping");

    let mut sink = CollectingSink::default();
    let mapping = Parser::new()
        .parse(file.path(), &mut sink)
        .expect("parse mapping document");
    (mapping, sink)
}

pub fn seed_database(setup_sql: &str) -> SqliteConnection {
    let conn = SqliteConnection::open(":memory:").expect("open in-memory sqlite database");
    conn.execute_batch(setup_sql).expect("seed database");
    conn
}
