//! Port contracts for telemetry ingestion.

mod repository;
mod tabular;

pub use repository::{
    AllDeletionSummary, HostDeletionSummary, TelemetryRepository, TelemetryRepositoryError,
    TelemetryRepositoryResult,
};
pub use tabular::{
    ImportFailureSink, JSON_COLUMN, TabularRow, TabularSource, TabularSourceError,
};
