//! Dataset-level drift aggregation over every shared column.

use tracing::{info, warn};

use super::column::{ColumnDriftResult, ColumnDriftTest};
use super::report::DriftReport;
use crate::error::Result;
use crate::input::DataTable;
use crate::schema::SchemaCatalog;

/// Runs the per-column drift test over every column shared by both
/// partitions and derives the dataset-level verdict.
#[derive(Debug, Clone)]
pub struct DriftAggregator {
    column_test: ColumnDriftTest,
    drift_share_threshold: f64,
}

impl DriftAggregator {
    /// Create an aggregator with default thresholds. The default share
    /// threshold flags dataset drift as soon as any column drifts.
    pub fn new() -> Self {
        Self {
            column_test: ColumnDriftTest::new(),
            drift_share_threshold: f64::EPSILON,
        }
    }

    /// Create an aggregator with a custom column test and share threshold.
    pub fn with_thresholds(column_test: ColumnDriftTest, drift_share_threshold: f64) -> Self {
        Self {
            column_test,
            drift_share_threshold,
        }
    }

    /// Compare the two partitions column by column.
    ///
    /// Columns are visited in catalog order, numerical first. A catalog
    /// column missing from either partition is skipped with a warning and
    /// excluded from the totals; dataset columns in neither catalog list are
    /// ignored.
    pub fn run(
        &self,
        reference: &DataTable,
        current: &DataTable,
        catalog: &SchemaCatalog,
    ) -> Result<DriftReport> {
        let mut per_column: Vec<ColumnDriftResult> = Vec::new();

        let columns = catalog
            .numerical_columns()
            .iter()
            .chain(catalog.categorical_columns())
            .filter_map(|name| catalog.kind_of(name).map(|kind| (name, kind)));

        for (name, kind) in columns {
            let (Some(reference_values), Some(current_values)) =
                (reference.column_by_name(name), current.column_by_name(name))
            else {
                warn!(
                    column = %name,
                    "column missing from one partition, excluded from drift comparison"
                );
                continue;
            };

            let result =
                self.column_test
                    .compare(name, &reference_values, &current_values, kind)?;
            per_column.push(result);
        }

        let report = DriftReport::from_results(per_column, self.drift_share_threshold);
        info!(
            drifted = report.drifted_columns,
            total = report.total_columns,
            dataset_drift = report.dataset_drift_detected,
            "{}/{} columns drifted",
            report.drifted_columns,
            report.total_columns
        );

        Ok(report)
    }
}

impl Default for DriftAggregator {
    fn default() -> Self {
        Self::new()
    }
}
