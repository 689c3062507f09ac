use std::{
    error::Error,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use serde_json::{Map, Value as JsonValue};
use tracing::info;
use tracing_subscriber::EnvFilter;
use yxdb::{
    YxdbReader,
    types::{field_type::FieldType, value::Value},
};

/// Dump the records of a .yxdb file as JSON lines
#[derive(Parser, Debug)]
#[command(name = "yxdb", version, about)]
struct Args {
    /// Path to the .yxdb file
    path: PathBuf,

    /// Print the field catalog instead of the records
    #[arg(short, long)]
    schema: bool,

    /// Stop after this many records
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<u64>,

    /// Emit spatial fields as hex instead of GeoJSON
    #[arg(long)]
    raw_spatial: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("yxdb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut reader = YxdbReader::open(&args.path)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.schema {
        serde_json::to_writer_pretty(&mut out, reader.fields())?;
        writeln!(out)?;
        return Ok(());
    }

    let mut written = 0u64;
    while args.limit.is_none_or(|limit| written < limit) && reader.next()? {
        let row = record_to_json(&reader, args.raw_spatial)?;
        serde_json::to_writer(&mut out, &row)?;
        writeln!(out)?;
        written += 1;
    }
    reader.close();
    out.flush()?;

    info!(records = written, total = reader.num_records(), "dump finished");
    Ok(())
}

fn record_to_json(reader: &YxdbReader, raw_spatial: bool) -> Result<Map<String, JsonValue>, Box<dyn Error>> {
    let mut row = Map::with_capacity(reader.fields().len());
    for field in reader.fields() {
        let value = if raw_spatial && field.field_type == FieldType::SpatialObj {
            Value::from(reader.read_blob(field.index)?)
        } else {
            reader.read(field.index)?
        };
        let json = match value {
            // hex, like Value's Display
            Value::Blob(_) => JsonValue::String(value.to_string()),
            other => serde_json::to_value(&other)?,
        };
        row.insert(field.name.clone(), json);
    }
    Ok(row)
}
