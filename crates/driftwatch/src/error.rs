//! Error types for the Driftwatch library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Driftwatch operations.
#[derive(Debug, Error)]
pub enum DriftwatchError {
    /// Malformed or incomplete schema configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading the schema configuration file.
    #[error("Configuration error for '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset partition could not be read.
    #[error("Data access error for '{path}': {source}")]
    DataAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to compare.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A declared-numerical column contains a value that cannot be parsed.
    #[error("Drift computation error in column '{column}': non-numeric value '{value}'")]
    DriftComputation { column: String, value: String },

    /// Error persisting the drift report.
    #[error("Persistence error for '{path}': {message}")]
    Persistence { path: PathBuf, message: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Driftwatch operations.
pub type Result<T> = std::result::Result<T, DriftwatchError>;
