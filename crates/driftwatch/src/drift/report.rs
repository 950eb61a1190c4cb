//! Dataset-level drift report and its persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::column::ColumnDriftResult;
use crate::error::{DriftwatchError, Result};
use crate::input::SourceMetadata;

/// Aggregated drift verdict for a pair of dataset partitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Per-column results, numerical columns first, each in catalog order.
    pub per_column: Vec<ColumnDriftResult>,
    /// Number of columns compared.
    pub total_columns: usize,
    /// Number of compared columns flagged as drifted.
    pub drifted_columns: usize,
    /// `drifted_columns / total_columns` (0 when nothing was compared).
    pub drift_share: f64,
    /// Share threshold the dataset verdict was derived with.
    pub drift_share_threshold: f64,
    /// Dataset-level drift verdict, derived from the share and threshold.
    pub dataset_drift_detected: bool,
    /// Provenance of the reference partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<SourceMetadata>,
    /// Provenance of the current partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<SourceMetadata>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl DriftReport {
    /// Build a report from per-column results, deriving every aggregate field.
    pub fn from_results(per_column: Vec<ColumnDriftResult>, drift_share_threshold: f64) -> Self {
        let total_columns = per_column.len();
        let drifted_columns = per_column.iter().filter(|r| r.is_drifted).count();
        let drift_share = if total_columns == 0 {
            0.0
        } else {
            drifted_columns as f64 / total_columns as f64
        };
        let dataset_drift_detected = total_columns > 0 && drift_share >= drift_share_threshold;

        Self {
            per_column,
            total_columns,
            drifted_columns,
            drift_share,
            drift_share_threshold,
            dataset_drift_detected,
            reference: None,
            current: None,
            generated_at: Utc::now(),
        }
    }

    /// Attach partition provenance.
    pub fn with_sources(mut self, reference: SourceMetadata, current: SourceMetadata) -> Self {
        self.reference = Some(reference);
        self.current = Some(current);
        self
    }

    /// Save the report as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DriftwatchError::Persistence {
                    path: path.to_path_buf(),
                    message: format!("failed to create directory '{}': {}", parent.display(), e),
                })?;
            }
        }

        let file = File::create(path).map_err(|e| DriftwatchError::Persistence {
            path: path.to_path_buf(),
            message: format!("failed to create file: {}", e),
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| DriftwatchError::Persistence {
            path: path.to_path_buf(),
            message: format!("failed to serialize report: {}", e),
        })?;

        Ok(())
    }

    /// Load a previously saved report.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| DriftwatchError::Persistence {
            path: path.to_path_buf(),
            message: format!("failed to open file: {}", e),
        })?;

        let reader = BufReader::new(file);
        let report = serde_json::from_reader(reader)?;
        Ok(report)
    }

    /// Render a human-readable summary of the report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Dataset drift: {} ({}/{} columns drifted, share {:.2})\n",
            if self.dataset_drift_detected {
                "DETECTED"
            } else {
                "not detected"
            },
            self.drifted_columns,
            self.total_columns,
            self.drift_share,
        ));

        for result in &self.per_column {
            out.push_str(&format!(
                "  {:24} {:12} {:18} stat={:<10.4} p={:<10.4} {}{}\n",
                result.column_name,
                result.column_kind.label(),
                result.method.label(),
                result.test_statistic,
                result.p_value,
                if result.is_drifted { "DRIFTED" } else { "ok" },
                if result.low_confidence {
                    " (low confidence)"
                } else {
                    ""
                },
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::column::DriftMethod;
    use crate::schema::ColumnKind;

    fn result(name: &str, drifted: bool) -> ColumnDriftResult {
        ColumnDriftResult {
            column_name: name.to_string(),
            column_kind: ColumnKind::Numerical,
            method: DriftMethod::KolmogorovSmirnov,
            test_statistic: if drifted { 0.8 } else { 0.05 },
            p_value: if drifted { 0.001 } else { 0.9 },
            is_drifted: drifted,
            low_confidence: false,
        }
    }

    #[test]
    fn test_aggregate_fields_derived() {
        let report = DriftReport::from_results(
            vec![result("a", true), result("b", false), result("c", true)],
            f64::EPSILON,
        );

        assert_eq!(report.total_columns, 3);
        assert_eq!(report.drifted_columns, 2);
        assert!((report.drift_share - 2.0 / 3.0).abs() < 1e-12);
        assert!(report.dataset_drift_detected);
    }

    #[test]
    fn test_no_columns_means_no_drift() {
        let report = DriftReport::from_results(vec![], f64::EPSILON);
        assert_eq!(report.total_columns, 0);
        assert_eq!(report.drift_share, 0.0);
        assert!(!report.dataset_drift_detected);
    }

    #[test]
    fn test_share_threshold_applies() {
        let results = vec![result("a", true), result("b", false)];
        let strict = DriftReport::from_results(results.clone(), 0.75);
        assert!(!strict.dataset_drift_detected);

        let lenient = DriftReport::from_results(results, 0.5);
        assert!(lenient.dataset_drift_detected);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("drift.json");

        let report = DriftReport::from_results(vec![result("a", true)], f64::EPSILON);
        report.save(&path).unwrap();

        let loaded = DriftReport::load(&path).unwrap();
        assert_eq!(loaded.total_columns, 1);
        assert!(loaded.dataset_drift_detected);
    }

    #[test]
    fn test_to_text_mentions_columns() {
        let report = DriftReport::from_results(vec![result("wage", true)], f64::EPSILON);
        let text = report.to_text();
        assert!(text.contains("wage"));
        assert!(text.contains("DRIFTED"));
    }
}
