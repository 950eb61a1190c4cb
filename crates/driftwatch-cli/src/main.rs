//! Driftwatch command-line entry point.
//!
//! A thin collaborator around the `driftwatch` library: it supplies paths
//! and configuration, runs the validation workflow, and displays the
//! returned artifact.

mod cli;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use driftwatch::{DriftReport, Driftwatch, DriftwatchConfig};

fn main() {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(passed) => std::process::exit(if passed { 0 } else { 1 }),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run(cli: &cli::Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = DriftwatchConfig::default().with_significance_threshold(cli.significance);
    if let Some(ref report) = cli.report {
        config = config.with_report_path(report.clone());
    }

    let engine = Driftwatch::from_schema_file(&cli.schema, config)?;
    let artifact = engine.validate(&cli.reference, &cli.current)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(artifact.validation_status);
    }

    let status = if artifact.validation_status {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("{} {}", "Validation".cyan().bold(), status);
    println!("{}", artifact.message);

    if !artifact.drift_report_path.is_empty() {
        println!("Drift report: {}", artifact.drift_report_path.white());

        if cli.verbose {
            let report = DriftReport::load(&artifact.drift_report_path)?;
            println!();
            print!("{}", report.to_text());
        }
    }

    Ok(artifact.validation_status)
}
