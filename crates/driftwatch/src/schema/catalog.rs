//! Schema catalog: the configured expectation a dataset is validated against.

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{DriftwatchError, Result};

/// Declared kind of a column, which selects the drift test applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numerical,
    Categorical,
}

impl ColumnKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numerical => "numerical",
            ColumnKind::Categorical => "categorical",
        }
    }
}

/// Raw shape of the YAML schema configuration document.
#[derive(Debug, Deserialize)]
struct RawSchemaConfig {
    /// Ordered list of `name: type` entries; its length is the expected column count.
    columns: Vec<IndexMap<String, String>>,
    numerical_columns: Vec<String>,
    categorical_columns: Vec<String>,
}

/// The expected schema: total column count plus the required numerical and
/// categorical column names, in declared order.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    expected_column_count: usize,
    numerical_columns: IndexSet<String>,
    categorical_columns: IndexSet<String>,
}

impl SchemaCatalog {
    /// Load the catalog from a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let text = fs::read_to_string(path).map_err(|e| DriftwatchError::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: RawSchemaConfig = serde_yaml::from_str(&text).map_err(|e| {
            DriftwatchError::Config(format!("failed to parse '{}': {}", path.display(), e))
        })?;

        Self::from_parts(
            raw.columns
                .iter()
                .flat_map(|entry| entry.keys().cloned())
                .collect(),
            raw.numerical_columns,
            raw.categorical_columns,
        )
    }

    /// Build a catalog from already-parsed column lists.
    pub fn from_parts(
        columns: Vec<String>,
        numerical: Vec<String>,
        categorical: Vec<String>,
    ) -> Result<Self> {
        let all_columns: IndexSet<String> = columns.into_iter().collect();
        let numerical_columns: IndexSet<String> = numerical.into_iter().collect();
        let categorical_columns: IndexSet<String> = categorical.into_iter().collect();

        if let Some(overlap) = numerical_columns.intersection(&categorical_columns).next() {
            return Err(DriftwatchError::Config(format!(
                "column '{}' is declared both numerical and categorical",
                overlap
            )));
        }

        for name in numerical_columns.iter().chain(&categorical_columns) {
            if !all_columns.contains(name) {
                return Err(DriftwatchError::Config(format!(
                    "required column '{}' is not listed under 'columns'",
                    name
                )));
            }
        }

        if numerical_columns.len() + categorical_columns.len() > all_columns.len() {
            return Err(DriftwatchError::Config(
                "more required columns than declared columns".to_string(),
            ));
        }

        Ok(Self {
            expected_column_count: all_columns.len(),
            numerical_columns,
            categorical_columns,
        })
    }

    /// Total number of columns the dataset is expected to have.
    pub fn expected_column_count(&self) -> usize {
        self.expected_column_count
    }

    /// Required numerical column names, in declared order.
    pub fn numerical_columns(&self) -> &IndexSet<String> {
        &self.numerical_columns
    }

    /// Required categorical column names, in declared order.
    pub fn categorical_columns(&self) -> &IndexSet<String> {
        &self.categorical_columns
    }

    /// Resolve a column's declared kind, if it is required at all.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numerical_columns.contains(name) {
            Some(ColumnKind::Numerical)
        } else if self.categorical_columns.contains(name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }
}
