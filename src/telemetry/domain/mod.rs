//! Domain model for host telemetry ingestion.
//!
//! The telemetry domain models raw payloads, their flattened attribute rows,
//! the flattening rules between the two, and the filter predicate used to
//! query rows. Persistence stays outside this boundary.

mod error;
mod flatten;
mod filter;
mod ids;
mod import;
mod payload;
mod record;

pub use error::TelemetryDomainError;
pub use filter::{AttributeFilter, row_order};
pub use flatten::{FlatAttribute, ListPolicy, flatten, scalar_text};
pub use import::{FailedImportRow, ImportReport};
pub use ids::{AttributeRowId, HostName, MAX_HOST_NAME_LENGTH, RawRecordId, UNKNOWN_HOST};
pub use payload::{HOST_ATTRIBUTE, TelemetryPayload};
pub use record::{
    AttributeRow, PersistedAttributeRowData, PersistedRawRecordData, RawRecord, rows_from_flat,
};
