//! Main Driftwatch engine: the end-to-end validation workflow.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::drift::{ColumnDriftTest, DriftAggregator};
use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig};
use crate::schema::SchemaCatalog;
use crate::validation::SchemaValidator;

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct DriftwatchConfig {
    /// Parser configuration for both partitions.
    pub parser: ParserConfig,
    /// p-value cutoff for the distribution tests.
    pub significance_threshold: f64,
    /// PSI score cutoff for the sparse-categorical fallback.
    pub psi_threshold: f64,
    /// Share of drifted columns at which the dataset verdict flips. The
    /// default flags the dataset as soon as a single column drifts.
    pub drift_share_threshold: f64,
    /// Where the drift report is persisted.
    pub report_path: PathBuf,
}

impl Default for DriftwatchConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            significance_threshold: 0.05,
            psi_threshold: 0.1,
            drift_share_threshold: f64::EPSILON,
            report_path: PathBuf::from("reports/drift_report.json"),
        }
    }
}

impl DriftwatchConfig {
    /// Set the p-value cutoff for the distribution tests.
    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    /// Set the PSI score cutoff for the sparse-categorical fallback.
    pub fn with_psi_threshold(mut self, threshold: f64) -> Self {
        self.psi_threshold = threshold;
        self
    }

    /// Set the drifted-column share at which the dataset verdict flips.
    pub fn with_drift_share_threshold(mut self, threshold: f64) -> Self {
        self.drift_share_threshold = threshold;
        self
    }

    /// Set where the drift report is persisted.
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }
}

/// Terminal output of a validation run, consumed by the pipeline caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationArtifact {
    /// Schema conformance verdict. Drift is informational and never flips
    /// this to false.
    pub validation_status: bool,
    /// Human-readable summary; never empty.
    pub message: String,
    /// Path the drift report was written to, empty when schema validation
    /// failed and the drift stage never ran.
    pub drift_report_path: String,
}

/// The validation engine: schema conformance plus drift detection.
pub struct Driftwatch {
    catalog: SchemaCatalog,
    config: DriftwatchConfig,
    parser: Parser,
    aggregator: DriftAggregator,
}

impl Driftwatch {
    /// Create an engine with default configuration.
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self::with_config(catalog, DriftwatchConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(catalog: SchemaCatalog, config: DriftwatchConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let column_test = ColumnDriftTest::with_thresholds(
            config.significance_threshold,
            config.psi_threshold,
        );
        let aggregator =
            DriftAggregator::with_thresholds(column_test, config.drift_share_threshold);

        Self {
            catalog,
            config,
            parser,
            aggregator,
        }
    }

    /// Load the schema catalog from a YAML file and create an engine.
    pub fn from_schema_file(
        schema_path: impl AsRef<Path>,
        config: DriftwatchConfig,
    ) -> Result<Self> {
        let catalog = SchemaCatalog::load(schema_path)?;
        Ok(Self::with_config(catalog, config))
    }

    /// Run the end-to-end validation workflow over the two partitions.
    ///
    /// Both partitions are checked against the catalog; every failure is
    /// accumulated into a single message. Only when both conform does the
    /// drift stage run and persist its report. Schema conformance alone
    /// decides `validation_status`.
    pub fn validate(
        &self,
        reference_path: impl AsRef<Path>,
        current_path: impl AsRef<Path>,
    ) -> Result<ValidationArtifact> {
        info!("starting data validation");

        let (reference, reference_meta) = self.parser.parse_file(reference_path)?;
        let (current, current_meta) = self.parser.parse_file(current_path)?;

        let mut failures = String::new();
        self.check_partition("reference", &reference, &mut failures);
        self.check_partition("current", &current, &mut failures);

        if !failures.is_empty() {
            info!(message = %failures, "schema validation failed");
            return Ok(ValidationArtifact {
                validation_status: false,
                message: failures.trim_end().to_string(),
                drift_report_path: String::new(),
            });
        }

        let report = self
            .aggregator
            .run(&reference, &current, &self.catalog)?
            .with_sources(reference_meta, current_meta);

        report.save(&self.config.report_path)?;

        let message = if report.dataset_drift_detected {
            "Data drift detected."
        } else {
            "No significant data drift detected."
        };
        info!(message, "data validation complete");

        Ok(ValidationArtifact {
            validation_status: true,
            message: message.to_string(),
            drift_report_path: self.config.report_path.display().to_string(),
        })
    }

    /// Run both schema checks on one partition, appending failure text.
    fn check_partition(&self, partition: &str, table: &DataTable, failures: &mut String) {
        if !SchemaValidator::validate_column_count(table, &self.catalog) {
            failures.push_str(&format!("Columns are missing in {} dataset. ", partition));
        }

        let check = SchemaValidator::validate_required_columns(table, &self.catalog);
        if !check.missing_numerical.is_empty() {
            failures.push_str(&format!(
                "Required numerical columns are missing in {} dataset: [{}]. ",
                partition,
                check.missing_numerical.join(", ")
            ));
        }
        if !check.missing_categorical.is_empty() {
            failures.push_str(&format!(
                "Required categorical columns are missing in {} dataset: [{}]. ",
                partition,
                check.missing_categorical.join(", ")
            ));
        }
    }
}
