//! Per-column drift testing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::stats;
use crate::error::{DriftwatchError, Result};
use crate::input::DataTable;
use crate::schema::ColumnKind;

/// Category label used for null/missing cells so missingness shifts register
/// in the categorical tests.
const NULL_CATEGORY: &str = "<null>";

/// Statistical procedure that produced a column's drift verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftMethod {
    /// Two-sample Kolmogorov-Smirnov test (numerical columns).
    KolmogorovSmirnov,
    /// Chi-squared test of homogeneity (categorical columns).
    ChiSquared,
    /// Population stability index fallback (sparse categorical columns).
    PopulationStability,
}

impl DriftMethod {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DriftMethod::KolmogorovSmirnov => "Kolmogorov-Smirnov",
            DriftMethod::ChiSquared => "Chi-squared",
            DriftMethod::PopulationStability => "PSI",
        }
    }
}

/// Drift verdict for a single shared column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDriftResult {
    /// Column name.
    pub column_name: String,
    /// Declared kind from the schema catalog.
    pub column_kind: ColumnKind,
    /// Test used for the verdict.
    pub method: DriftMethod,
    /// Test statistic (KS distance, chi-squared statistic, or PSI).
    pub test_statistic: f64,
    /// p-value, or the PSI score itself for the PSI method.
    pub p_value: f64,
    /// Whether the column's distribution drifted.
    pub is_drifted: bool,
    /// Set when one side was empty or too sparse for a trustworthy verdict.
    pub low_confidence: bool,
}

impl ColumnDriftResult {
    /// A non-verdict for a column that could not be meaningfully tested.
    fn low_confidence(name: &str, kind: ColumnKind, method: DriftMethod) -> Self {
        Self {
            column_name: name.to_string(),
            column_kind: kind,
            method,
            test_statistic: 0.0,
            p_value: 1.0,
            is_drifted: false,
            low_confidence: true,
        }
    }
}

/// Compares the reference and current values of one column.
#[derive(Debug, Clone)]
pub struct ColumnDriftTest {
    /// p-value cutoff below which a column is declared drifted.
    significance_threshold: f64,
    /// PSI score above which a column is declared drifted.
    psi_threshold: f64,
    /// Smallest expected cell count the chi-squared approximation tolerates.
    min_expected_count: f64,
}

impl ColumnDriftTest {
    /// Create a drift test with the default thresholds (p < 0.05, PSI > 0.1).
    pub fn new() -> Self {
        Self {
            significance_threshold: 0.05,
            psi_threshold: 0.1,
            min_expected_count: 5.0,
        }
    }

    /// Create a drift test with custom thresholds.
    pub fn with_thresholds(significance_threshold: f64, psi_threshold: f64) -> Self {
        Self {
            significance_threshold,
            psi_threshold,
            min_expected_count: 5.0,
        }
    }

    /// Compare a column across the two partitions and produce a verdict.
    pub fn compare(
        &self,
        name: &str,
        reference: &[&str],
        current: &[&str],
        kind: ColumnKind,
    ) -> Result<ColumnDriftResult> {
        match kind {
            ColumnKind::Numerical => self.compare_numerical(name, reference, current),
            ColumnKind::Categorical => Ok(self.compare_categorical(name, reference, current)),
        }
    }

    fn compare_numerical(
        &self,
        name: &str,
        reference: &[&str],
        current: &[&str],
    ) -> Result<ColumnDriftResult> {
        let reference_values = parse_numeric(name, reference)?;
        let current_values = parse_numeric(name, current)?;

        if reference_values.is_empty() || current_values.is_empty() {
            warn!(column = name, "empty numerical column, drift verdict skipped");
            return Ok(ColumnDriftResult::low_confidence(
                name,
                ColumnKind::Numerical,
                DriftMethod::KolmogorovSmirnov,
            ));
        }

        let (statistic, p_value) = stats::ks_two_sample(&reference_values, &current_values);

        Ok(ColumnDriftResult {
            column_name: name.to_string(),
            column_kind: ColumnKind::Numerical,
            method: DriftMethod::KolmogorovSmirnov,
            test_statistic: statistic,
            p_value,
            is_drifted: p_value < self.significance_threshold,
            low_confidence: false,
        })
    }

    fn compare_categorical(
        &self,
        name: &str,
        reference: &[&str],
        current: &[&str],
    ) -> ColumnDriftResult {
        if reference.is_empty() || current.is_empty() {
            warn!(column = name, "empty categorical column, drift verdict skipped");
            return ColumnDriftResult::low_confidence(
                name,
                ColumnKind::Categorical,
                DriftMethod::ChiSquared,
            );
        }

        let (reference_counts, current_counts) = contingency_counts(reference, current);
        let (statistic, p_value, min_expected) =
            stats::chi_squared_homogeneity(&reference_counts, &current_counts);

        if min_expected >= self.min_expected_count {
            return ColumnDriftResult {
                column_name: name.to_string(),
                column_kind: ColumnKind::Categorical,
                method: DriftMethod::ChiSquared,
                test_statistic: statistic,
                p_value,
                is_drifted: p_value < self.significance_threshold,
                low_confidence: false,
            };
        }

        // Sparse cells make the chi-squared approximation unreliable
        let psi = stats::population_stability_index(&reference_counts, &current_counts);
        ColumnDriftResult {
            column_name: name.to_string(),
            column_kind: ColumnKind::Categorical,
            method: DriftMethod::PopulationStability,
            test_statistic: psi,
            p_value: psi,
            is_drifted: psi > self.psi_threshold,
            low_confidence: false,
        }
    }
}

impl Default for ColumnDriftTest {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the non-null cells of a declared-numerical column.
///
/// Any non-null cell that fails to parse is an irrecoverable type mismatch.
fn parse_numeric(name: &str, values: &[&str]) -> Result<Vec<f64>> {
    let mut parsed = Vec::with_capacity(values.len());
    for value in values {
        if DataTable::is_null_value(value) {
            continue;
        }
        let number = value
            .trim()
            .parse::<f64>()
            .map_err(|_| DriftwatchError::DriftComputation {
                column: name.to_string(),
                value: value.to_string(),
            })?;
        parsed.push(number);
    }
    Ok(parsed)
}

/// Frequency tables over the union of observed categories, in first-seen
/// order. Null cells are bucketed under [`NULL_CATEGORY`].
fn contingency_counts(reference: &[&str], current: &[&str]) -> (Vec<u64>, Vec<u64>) {
    let mut counts: IndexMap<String, (u64, u64)> = IndexMap::new();

    for value in reference {
        let key = category_key(value);
        counts.entry(key).or_insert((0, 0)).0 += 1;
    }
    for value in current {
        let key = category_key(value);
        counts.entry(key).or_insert((0, 0)).1 += 1;
    }

    counts.values().map(|&(r, c)| (r, c)).unzip()
}

fn category_key(value: &str) -> String {
    if DataTable::is_null_value(value) {
        NULL_CATEGORY.to_string()
    } else {
        value.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[&'static str]) -> Vec<&'static str> {
        values.to_vec()
    }

    #[test]
    fn test_identical_numerical_column_not_drifted() {
        let values: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("age", &refs, &refs, ColumnKind::Numerical)
            .unwrap();

        assert!(!result.is_drifted);
        assert_eq!(result.method, DriftMethod::KolmogorovSmirnov);
        assert_eq!(result.test_statistic, 0.0);
    }

    #[test]
    fn test_shifted_numerical_column_drifted() {
        let reference: Vec<String> = (0..100).map(|i| (i % 10).to_string()).collect();
        let current: Vec<String> = (0..100).map(|i| (i % 10 + 1000).to_string()).collect();
        let refs: Vec<&str> = reference.iter().map(String::as_str).collect();
        let curs: Vec<&str> = current.iter().map(String::as_str).collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("wage", &refs, &curs, ColumnKind::Numerical)
            .unwrap();

        assert!(result.is_drifted);
        assert!(result.p_value < 0.05);
    }

    #[test]
    fn test_non_numeric_cell_is_fatal() {
        let test = ColumnDriftTest::new();
        let err = test
            .compare(
                "age",
                &strs(&["1", "2", "oops"]),
                &strs(&["1", "2", "3"]),
                ColumnKind::Numerical,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            DriftwatchError::DriftComputation { ref column, ref value }
                if column == "age" && value == "oops"
        ));
    }

    #[test]
    fn test_nulls_skipped_in_numerical_column() {
        let test = ColumnDriftTest::new();
        let result = test
            .compare(
                "age",
                &strs(&["1", "NA", "2", ""]),
                &strs(&["1", "2"]),
                ColumnKind::Numerical,
            )
            .unwrap();

        assert!(!result.is_drifted);
        assert!(!result.low_confidence);
    }

    #[test]
    fn test_empty_numerical_column_low_confidence() {
        let test = ColumnDriftTest::new();
        let result = test
            .compare(
                "age",
                &strs(&["NA", "NA"]),
                &strs(&["1", "2"]),
                ColumnKind::Numerical,
            )
            .unwrap();

        assert!(!result.is_drifted);
        assert!(result.low_confidence);
        assert_eq!(result.test_statistic, 0.0);
    }

    #[test]
    fn test_identical_categorical_column_not_drifted() {
        let values: Vec<&str> = ["A", "B", "C"]
            .iter()
            .cycle()
            .take(120)
            .copied()
            .collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("region", &values, &values, ColumnKind::Categorical)
            .unwrap();

        assert!(!result.is_drifted);
        assert_eq!(result.method, DriftMethod::ChiSquared);
    }

    #[test]
    fn test_swapped_categorical_column_drifted() {
        let reference: Vec<&str> = std::iter::repeat_n("A", 90)
            .chain(std::iter::repeat_n("B", 10))
            .collect();
        let current: Vec<&str> = std::iter::repeat_n("A", 10)
            .chain(std::iter::repeat_n("B", 90))
            .collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("region", &reference, &current, ColumnKind::Categorical)
            .unwrap();

        assert!(result.is_drifted);
    }

    #[test]
    fn test_sparse_categorical_falls_back_to_psi() {
        // A rare category keeps an expected cell count below 5
        let reference: Vec<&str> = std::iter::repeat_n("A", 99).chain(["rare"]).collect();
        let current: Vec<&str> = std::iter::repeat_n("A", 100).collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("region", &reference, &current, ColumnKind::Categorical)
            .unwrap();

        assert_eq!(result.method, DriftMethod::PopulationStability);
        assert!(!result.is_drifted);
    }

    #[test]
    fn test_empty_categorical_column_low_confidence() {
        let test = ColumnDriftTest::new();
        let result = test
            .compare("region", &[], &strs(&["A"]), ColumnKind::Categorical)
            .unwrap();

        assert!(result.low_confidence);
        assert!(!result.is_drifted);
    }

    #[test]
    fn test_null_shift_registers_as_category() {
        let reference: Vec<&str> = std::iter::repeat_n("A", 50)
            .chain(std::iter::repeat_n("B", 50))
            .collect();
        let current: Vec<&str> = std::iter::repeat_n("A", 50)
            .chain(std::iter::repeat_n("", 50))
            .collect();

        let test = ColumnDriftTest::new();
        let result = test
            .compare("region", &reference, &current, ColumnKind::Categorical)
            .unwrap();

        assert!(result.is_drifted);
    }
}
