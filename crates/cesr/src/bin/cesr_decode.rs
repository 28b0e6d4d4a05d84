//! `cesr-decode`: decode a CESR stream (file or stdin) to stdout.
//!
//! Usage:
//!   cesr-decode [--tables DIR] [--format json|text] [--json-input] [FILE]
//!
//! Set `RUST_LOG=cesr_core=trace` to follow the decoder value by value.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use cesr::cli::{load_registry, read_input, render, CliError, OutputFormat};
use clap::Parser;

/// Decode a CESR stream, one line per decoded value
#[derive(Parser, Debug)]
#[command(name = "cesr-decode")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file (stdin when omitted)
    input: Option<PathBuf>,

    /// Directory holding generated sizes.json, codex.json and counter.json
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Treat the input as a JSON string or array of byte values
    #[arg(long)]
    json_input: bool,
}

fn run(args: &Args) -> Result<usize, CliError> {
    let bytes = match &args.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let input = read_input(bytes, args.json_input)?;
    let registry = load_registry(args.tables.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&mut out, input.as_input(), registry, args.format)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(count) => log::info!("decoded {count} values"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
