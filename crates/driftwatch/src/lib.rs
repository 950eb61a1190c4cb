//! Driftwatch: schema validation and drift detection for tabular datasets.
//!
//! Driftwatch checks that a freshly produced dataset, split into a reference
//! ("training") partition and a current ("testing") partition, conforms to an
//! expected schema, then tests every shared column for statistically
//! significant distributional change before the dataset feeds a downstream
//! training stage.
//!
//! # Core behavior
//!
//! - **Schema first**: column count and required-column checks run on both
//!   partitions; every failure is reported in one pass
//! - **Drift second**: only schema-conformant datasets are compared, column
//!   by column, with a test chosen per declared column kind
//! - **Drift is informational**: a drifted dataset still validates; the
//!   report records the evidence for the caller to act on
//!
//! # Example
//!
//! ```no_run
//! use driftwatch::{Driftwatch, DriftwatchConfig};
//!
//! let engine = Driftwatch::from_schema_file(
//!     "config/schema.yaml",
//!     DriftwatchConfig::default(),
//! ).unwrap();
//!
//! let artifact = engine.validate("data/train.csv", "data/test.csv").unwrap();
//! println!("{}: {}", artifact.validation_status, artifact.message);
//! ```

pub mod drift;
pub mod error;
pub mod input;
pub mod schema;
pub mod validation;

mod driftwatch;

pub use crate::driftwatch::{Driftwatch, DriftwatchConfig, ValidationArtifact};
pub use drift::{ColumnDriftResult, ColumnDriftTest, DriftAggregator, DriftMethod, DriftReport};
pub use error::{DriftwatchError, Result};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use schema::{ColumnKind, SchemaCatalog};
pub use validation::{RequiredColumnsCheck, SchemaValidator};
