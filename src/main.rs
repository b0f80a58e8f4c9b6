//! Reads interval trading records and prints the per-stock volume share and
//! day high/low report.
//!
//! Diagnostics go to stderr, filtered by `RUST_LOG` (default: warn).

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vwaper::{Market, Report, format::DEFAULT_PRECISION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `stock,interval,%volume` lines, `#`, then `stock,high,low` lines
    Csv,
    /// Boxed tables
    Table,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file, one `symbol interval volume high low` record per line
    #[arg(default_value = "data/market.txt")]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Significant digits for prices and percentages in csv output
    #[arg(long, default_value_t = DEFAULT_PRECISION as u8, value_parser = clap::value_parser!(u8).range(1..=17))]
    precision: u8,

    /// Stop at the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_market(args: &Args) -> Result<Market> {
    let file = File::open(&args.input)
        .with_context(|| format!("could not open file: {}", args.input.display()))?;

    let mut market = Market::new();
    let summary = market
        .ingest_reader(BufReader::new(file), args.strict)
        .with_context(|| format!("reading {}", args.input.display()))?;

    info!(
        lines = summary.lines,
        records = summary.records,
        skipped = summary.skipped,
        stocks = market.len(),
        intervals = market.max_interval_seen(),
        "ingested"
    );

    Ok(market)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let market = read_market(&args)?;
    let report = Report::generate(&market);

    match args.format {
        OutputFormat::Csv => report.write_csv(io::stdout().lock(), usize::from(args.precision))?,
        OutputFormat::Table => println!("{report}"),
    }

    Ok(())
}
