//! nexo2ct: convert a Nexo transaction export into a CoinTracking import file.
//!
//! Without `--output` the converted CSV is printed to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexo_cointracking::utils::CsvTransactionSource;
use nexo_cointracking::{Converter, ConverterConfig};

#[derive(Parser)]
#[command(
    name = "nexo2ct",
    about = "Convert a Nexo transaction export into a CoinTracking CSV import"
)]
struct Cli {
    /// Nexo transaction export (CSV).
    input: PathBuf,

    /// Write the CoinTracking CSV here instead of printing it.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// TOML file overriding exchange name, stablecoin and currency aliases.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nexo_cointracking=info,nexo2ct=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };
    let converter = Converter::new(config);

    let source = CsvTransactionSource::from_path(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;

    // A failed run must not leave a partial file behind.
    let csv = converter
        .convert_to_string(source)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, csv.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "saved CoinTracking import");
        }
        None => {
            std::io::stdout()
                .write_all(csv.as_bytes())
                .context("failed to write to stdout")?;
        }
    }

    Ok(())
}
