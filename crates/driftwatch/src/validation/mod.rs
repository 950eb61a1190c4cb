//! Schema conformance checks against the catalog.

mod schema_check;

pub use schema_check::{RequiredColumnsCheck, SchemaValidator};
