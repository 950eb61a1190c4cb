//! Tabular input: CSV parsing and the in-memory table representation.

mod parser;
mod table;

pub use parser::{Parser, ParserConfig};
pub use table::{DataTable, SourceMetadata};
