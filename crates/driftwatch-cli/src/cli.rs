//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Driftwatch: schema validation and drift detection for tabular datasets
#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the reference (training) partition CSV
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Path to the current (testing) partition CSV
    #[arg(value_name = "CURRENT")]
    pub current: PathBuf,

    /// Path to the YAML schema configuration
    #[arg(short, long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Output path for the drift report (default: reports/drift_report.json)
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Significance threshold for the distribution tests
    #[arg(long, default_value = "0.05")]
    pub significance: f64,

    /// Print the validation artifact as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the per-column drift report after a successful run
    #[arg(short, long)]
    pub verbose: bool,
}
