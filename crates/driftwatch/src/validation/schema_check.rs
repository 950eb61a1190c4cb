//! Column-count and required-column conformance checks.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::DataTable;
use crate::schema::SchemaCatalog;

/// Outcome of the required-column presence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredColumnsCheck {
    /// True iff no required column is missing.
    pub passed: bool,
    /// Required numerical columns absent from the dataset, in catalog order.
    pub missing_numerical: Vec<String>,
    /// Required categorical columns absent from the dataset, in catalog order.
    pub missing_categorical: Vec<String>,
}

/// Validates a dataset's shape against a [`SchemaCatalog`].
///
/// The two checks are independent and are both always run, so a single pass
/// reports every problem rather than the first one.
pub struct SchemaValidator;

impl SchemaValidator {
    /// True iff the dataset has exactly the expected number of columns.
    pub fn validate_column_count(table: &DataTable, catalog: &SchemaCatalog) -> bool {
        let observed = table.column_count();
        let expected = catalog.expected_column_count();
        let status = observed == expected;
        info!(observed, expected, status, "column count check");
        status
    }

    /// Check that every required numerical and categorical column is present.
    pub fn validate_required_columns(
        table: &DataTable,
        catalog: &SchemaCatalog,
    ) -> RequiredColumnsCheck {
        let missing_numerical: Vec<String> = catalog
            .numerical_columns()
            .iter()
            .filter(|name| !table.has_column(name))
            .cloned()
            .collect();

        let missing_categorical: Vec<String> = catalog
            .categorical_columns()
            .iter()
            .filter(|name| !table.has_column(name))
            .cloned()
            .collect();

        if !missing_numerical.is_empty() {
            info!(columns = ?missing_numerical, "missing numerical columns");
        }
        if !missing_categorical.is_empty() {
            info!(columns = ?missing_categorical, "missing categorical columns");
        }

        RequiredColumnsCheck {
            passed: missing_numerical.is_empty() && missing_categorical.is_empty(),
            missing_numerical,
            missing_categorical,
        }
    }
}
