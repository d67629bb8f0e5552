//! Command-line front-end: parses a mapping document, opens a database,
//! and writes generated triples to a file or stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, ValueEnum};

use r2rml::db::sqlite::SqliteConnection;
use r2rml::diagnostics::{CollectingSink, TeeSink, TracingSink};
use r2rml::generator::writer::{NTriplesWriter, RdfWriter, TurtleWriter};
use r2rml::generator::Generator;
use r2rml::parser::Parser as MappingParser;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Ntriples,
    Turtle,
}

/// Maps relational database rows to RDF triples according to an R2RML
/// mapping document.
#[derive(ClapParser, Debug)]
#[command(name = "r2rml", version, about)]
struct Cli {
    /// Path to the R2RML mapping document (Turtle).
    mapping: PathBuf,

    /// Path to the SQLite database to map.
    database: PathBuf,

    /// Output path; writes to stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output serialization.
    #[arg(short = 'f', long, value_enum, default_value = "ntriples")]
    format: OutputFormat,

    /// Prints the parsed mapping's structure (via its `Display` impl) to
    /// stderr before generating, along with every diagnostic collected
    /// during parsing.
    #[arg(long)]
    dump_mapping: bool,

    /// Enables debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn open_output(path: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut tracing_sink = TracingSink;
    let mut dump_sink = CollectingSink::default();
    let mapping = {
        let mut sink = TeeSink {
            a: &mut tracing_sink,
            b: &mut dump_sink,
        };
        MappingParser::new()
            .parse(&cli.mapping, &mut sink)
            .context("failed to parse mapping document")?
    };

    if cli.dump_mapping {
        eprintln!("{mapping}");
        for diagnostic in &dump_sink.diagnostics {
            eprintln!("anomaly: {diagnostic}");
        }
    }

    if !mapping.is_valid() {
        bail!("mapping is invalid, refusing to generate");
    }

    let conn = SqliteConnection::open(&cli.database).context("failed to open database")?;

    let output = open_output(&cli.output).context("failed to open output")?;

    let mut writer: Box<dyn RdfWriter> = match cli.format {
        OutputFormat::Ntriples => Box::new(NTriplesWriter::new(output)),
        OutputFormat::Turtle => Box::new(
            TurtleWriter::new(output, &mapping.namespaces).context("failed to open output")?,
        ),
    };

    Generator::new()
        .generate(&mapping, &conn, writer.as_mut())
        .context("triple generation failed")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("r2rml: {err:#}");
            ExitCode::FAILURE
        }
    }
}
