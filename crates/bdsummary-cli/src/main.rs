//! bdsummary CLI - Black Duck security-risk summary
//!
//! Command-line interface for turning resolved findings into the review workbook.

mod config;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bdsummary_core::{ColumnSchema, RowRecord};
use bdsummary_render::SummaryReport;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bdsummary")]
#[command(author, version, about = "Black Duck security-risk summary report", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the summary workbook from a findings file
    Generate {
        /// JSON array of resolved findings
        #[arg(value_name = "FINDINGS")]
        findings: PathBuf,

        /// Directory that receives the report
        #[arg(short, long, env = "BDSUMMARY_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// TOML config file (defaults to ./bdsummary.toml when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the report columns
    Columns,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Some(Commands::Generate {
            findings,
            output_dir,
            config,
        }) => {
            let report_config = config::resolve(output_dir, config.as_deref())?;
            let records = load_findings(&findings)?;

            let mut report = SummaryReport::new(report_config);
            report.initialize()?;
            for record in &records {
                report.populate_row(record)?;
            }
            let output_dir = report.config().output_dir.display().to_string();
            let path = report
                .save_report()
                .with_context(|| format!("Failed to write report to {output_dir}"))?;

            println!("{}", path.display());
        }
        Some(Commands::Columns) => {
            for (index, label) in ColumnSchema::blackduck().entries() {
                println!("{index}\t{label}");
            }
        }
        None => {
            println!("bdsummary - Black Duck security-risk summary");
            println!("Run with --help for usage information");
        }
    }

    Ok(())
}

/// Read the resolved findings, keeping their order
fn load_findings(path: &Path) -> Result<Vec<RowRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read findings: {}", path.display()))?;
    let records: Vec<RowRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid findings file: {}", path.display()))?;
    tracing::debug!(count = records.len(), "findings loaded");
    Ok(records)
}
