use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use sellers::{Dataset, Options, Report};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    /// Aligned table with totals
    #[default]
    Text,
    /// JSON array of report rows
    Json,
    /// CSV, one line per seller
    Csv,
}

#[derive(Parser)]
#[command(version, about)]
/// Ranks sellers by profit and computes their bonuses.
struct Args {
    /// JSON file holding `sellers`, `products`, and `purchase_records`
    data: PathBuf,
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
    /// Write the report to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let data = Dataset::from_path(&args.data)?;
    let report = Report::analyze(&data, &Options::default())
        .with_context(|| format!("analysing {}", args.data.display()))?;
    tracing::info!(sellers = report.rows().len(), "report ready");

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        Format::Text => write!(out, "{report}")?,
        Format::Json => report.write_json(&mut out)?,
        Format::Csv => report.write_csv(&mut out)?,
    }
    out.flush()?;
    Ok(())
}
