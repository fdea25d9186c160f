//! Analyze command - classify a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docsort_core::DocumentAnalyzer;

use super::config::load_config;
use super::output::{OutputFormat, format_record};
use crate::acquire::acquire;

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (PDF, text or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Analyzing file: {}", args.input.display());

    let analyzer = DocumentAnalyzer::from_config(&config)?;
    let input = acquire(&args.input)?;
    let record = analyzer.analyze(&input)?;

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if record.is_degraded() {
        eprintln!(
            "{} No text available for {}, classified by file name",
            style("ℹ").blue(),
            record.filename
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
