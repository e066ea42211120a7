//! Application services for telemetry ingestion and bulk import.

mod import;
mod ingestion;

pub use import::{MISSING_JSON_MESSAGE, TelemetryImportService};
pub use ingestion::{
    TelemetryIngestionService, TelemetryServiceError, TelemetryServiceResult, TelemetryStore,
};
