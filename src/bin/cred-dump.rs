//! cred-dump CLI
//!
//! Extract selected fields from a pipe-delimited credential dump.

use anyhow::{Context, Result};
use clap::Parser;
use cred_dump::{Extractor, OutputSelection};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cred-dump")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Extract fields from pipe-delimited credential dumps")]
#[command(after_help = "FIELDS digits (default 000100):
  100000  id
  010000  name
  001000  email
  000100  password as hex
  000200  password as base64
  000010  hint
  000001  all selected fields required

Examples:
  cred-dump cred cred-out            hex passwords
  cred-dump cred cred-out 001000     email addresses only
  cred-dump cred cred-out 001200     emails and base64 passwords
  cred-dump - - 000110 < cred        hex passwords and hints")]
struct Cli {
    /// Input dump file ('-' for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file ('-' for stdout)
    #[arg(default_value = "-")]
    output: PathBuf,

    /// Field selection digits
    fields: Option<OutputSelection>,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let selection = cli.fields.unwrap_or_default();
    let input = open_input(&cli.input)?;
    let mut output = open_output(&cli.output)?;

    let extractor = Extractor::new(selection);
    let stats = extractor
        .run(input, &mut output, io::stderr().lock())
        .context("Input is not in the expected record format")?;
    output.flush().context("Failed to write output")?;

    if cli.verbose > 0 {
        eprintln!(
            "Processed {} records -> {} lines ({} suppressed, {} bad base64)",
            stats.records, stats.written, stats.suppressed, stats.bad_base64
        );
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create: {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
