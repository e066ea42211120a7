//! Identifier and validated-name types for telemetry records.

use super::TelemetryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Host name used when a payload does not carry a usable `host` field.
pub const UNKNOWN_HOST: &str = "unknown";

/// Maximum host name length in characters, matching the `VARCHAR(255)`
/// columns.
pub const MAX_HOST_NAME_LENGTH: usize = 255;

/// Unique identifier for a stored raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecordId(Uuid);

impl RawRecordId {
    /// Creates a new random raw record identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a raw record identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RawRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RawRecordId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a flattened attribute row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRowId(Uuid);

impl AttributeRowId {
    /// Creates a new random attribute row identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an attribute row identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AttributeRowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttributeRowId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of the machine a payload describes.
///
/// Host names are stored verbatim. They must not be blank and must fit in
/// [`MAX_HOST_NAME_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostName(String);

impl HostName {
    /// Creates a validated host name.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryDomainError::EmptyHostName`] when the value is empty
    /// or whitespace only, and [`TelemetryDomainError::HostNameTooLong`] when
    /// it exceeds [`MAX_HOST_NAME_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TelemetryDomainError> {
        let host = value.into();
        if host.trim().is_empty() {
            return Err(TelemetryDomainError::EmptyHostName);
        }
        let length = host.chars().count();
        if length > MAX_HOST_NAME_LENGTH {
            return Err(TelemetryDomainError::HostNameTooLong(length));
        }
        Ok(Self(host))
    }

    /// Returns the placeholder host assigned to payloads without one.
    #[must_use]
    pub fn unknown() -> Self {
        Self(UNKNOWN_HOST.to_owned())
    }

    /// Returns the host name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HostName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
