//! Macro factor betas CLI tool.
//!
//! Downloads daily closes, converts them to daily changes and regresses every
//! asset on the available macro factors with Newey-West standard errors.
//!
//! Usage: `betas [--days N] [--maxlags N] [--student-t] [--small-sample] [--format FORMAT]`
//! Example: `cargo run --features cli --bin betas -- --days 520 --ticker BUND=TMBMKDE-10Y`

use std::io;

use clap::{Parser, ValueEnum};
use macrobeta::{
    data::{DEFAULT_LOOKBACK_DAYS, FetchConfig, TickerOverride, YahooSource},
    model::{BetaConfig, BetaEstimator, ModelError, PValueDistribution},
    primitives::ResultTable,
    utils::build_changes,
};
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Output format of the result table.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Fixed-width table rounded to four decimals.
    Text,
    /// JSON array of rows, full precision.
    Json,
    /// CSV with a header row, full precision.
    Csv,
}

/// Estimate macro factor betas from Yahoo Finance closes.
#[derive(Debug, Parser)]
#[command(name = "betas", version, about)]
struct Args {
    /// Calendar days of history to download.
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
    days: u32,

    /// Newey-West truncation lag.
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    maxlags: i64,

    /// Use Student-t p-values with n - k degrees of freedom.
    #[arg(long)]
    student_t: bool,

    /// Scale the HAC covariance by n / (n - k).
    #[arg(long)]
    small_sample: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Override or add a ticker, e.g. `BUND=TMBMKDE-10Y`. Repeatable.
    #[arg(long = "ticker", value_name = "NAME=SYMBOL")]
    tickers: Vec<TickerOverride>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(table) => print_table(&table, args.format)?,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run(args: &Args) -> Result<ResultTable, Box<dyn std::error::Error>> {
    let config = args
        .tickers
        .iter()
        .fold(FetchConfig::default().with_lookback_days(args.days), |config, o| {
            config.with_ticker(o.instrument, o.symbol.clone())
        });

    let source = YahooSource::new(config)?;
    let prices = source.fetch_configured().await?;
    let changes = build_changes(&prices)?;
    info!(dates = changes.height(), series = changes.instruments().count(), "built daily changes");

    let maxlags = usize::try_from(args.maxlags)
        .map_err(|_| ModelError::InvalidLag { maxlags: args.maxlags, nobs: changes.height() })?;
    let config = BetaConfig {
        maxlags,
        pvalue: if args.student_t {
            PValueDistribution::StudentT
        } else {
            PValueDistribution::Normal
        },
        small_sample_correction: args.small_sample,
    };

    match BetaEstimator::with_config(config).estimate(&changes) {
        Err(e) if e.is_configuration() => {
            Err(format!("{e} (no usable price series for the known assets or factors)").into())
        }
        other => Ok(other?),
    }
}

fn print_table(table: &ResultTable, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Text => println!("{table}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(table.rows())?),
        Format::Csv => {
            let mut frame = table.to_frame()?;
            CsvWriter::new(io::stdout()).include_header(true).finish(&mut frame)?;
        }
    }
    Ok(())
}
