//! Expected-schema catalog loaded from configuration.

mod catalog;

pub use catalog::{ColumnKind, SchemaCatalog};
