//! Drift detection: per-column statistical tests and dataset aggregation.

mod aggregator;
mod column;
mod report;
pub mod stats;

pub use aggregator::DriftAggregator;
pub use column::{ColumnDriftResult, ColumnDriftTest, DriftMethod};
pub use report::DriftReport;
