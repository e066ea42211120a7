//! Error types for telemetry domain validation and flattening.

use thiserror::Error;

/// Errors returned while constructing telemetry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelemetryDomainError {
    /// The host name is empty.
    #[error("host name must not be empty")]
    EmptyHostName,

    /// The host name is longer than the stores accept.
    #[error("host name is {0} characters long, the limit is 255")]
    HostNameTooLong(usize),

    /// The submitted payload is not a JSON object.
    #[error("telemetry payload must be a JSON object, found {0}")]
    PayloadNotObject(&'static str),

    /// A top-level attribute holds a nested mapping, which cannot be
    /// projected onto a single attribute row.
    #[error("attribute '{attribute}' holds a nested object, which cannot be flattened")]
    NestedValue {
        /// Name of the offending attribute.
        attribute: String,
    },
}
