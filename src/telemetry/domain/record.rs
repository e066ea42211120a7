//! Stored telemetry records: raw payloads and their flattened attribute rows.

use super::{AttributeRowId, FlatAttribute, HostName, RawRecordId, TelemetryPayload};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Verbatim copy of one telemetry submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    id: RawRecordId,
    host: HostName,
    payload: TelemetryPayload,
    received_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRawRecordData {
    /// Persisted record identifier.
    pub id: RawRecordId,
    /// Persisted host name.
    pub host: HostName,
    /// Persisted payload.
    pub payload: TelemetryPayload,
    /// Persisted receipt timestamp.
    pub received_at: DateTime<Utc>,
}

impl RawRecord {
    /// Creates a new raw record stamped with the current clock time.
    #[must_use]
    pub fn new(host: HostName, payload: TelemetryPayload, clock: &impl Clock) -> Self {
        Self {
            id: RawRecordId::new(),
            host,
            payload,
            received_at: clock.utc(),
        }
    }

    /// Reconstructs a raw record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRawRecordData) -> Self {
        Self {
            id: data.id,
            host: data.host,
            payload: data.payload,
            received_at: data.received_at,
        }
    }

    /// Overwrites the stored payload and restamps the receipt time.
    pub fn replace_payload(&mut self, payload: TelemetryPayload, clock: &impl Clock) {
        self.payload = payload;
        self.received_at = clock.utc();
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> RawRecordId {
        self.id
    }

    /// Returns the host the payload describes.
    #[must_use]
    pub const fn host(&self) -> &HostName {
        &self.host
    }

    /// Returns the stored payload.
    #[must_use]
    pub const fn payload(&self) -> &TelemetryPayload {
        &self.payload
    }

    /// Returns the receipt timestamp.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// One queryable attribute projected from a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    id: AttributeRowId,
    host: HostName,
    attribute_name: String,
    attribute_value: String,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted attribute row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttributeRowData {
    /// Persisted row identifier.
    pub id: AttributeRowId,
    /// Persisted host name.
    pub host: HostName,
    /// Persisted attribute name.
    pub attribute_name: String,
    /// Persisted attribute value text.
    pub attribute_value: String,
    /// Persisted recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl AttributeRow {
    /// Creates a row from a flattened triple, stamped with `recorded_at`.
    #[must_use]
    pub fn from_flat(attribute: FlatAttribute, recorded_at: DateTime<Utc>) -> Self {
        let FlatAttribute { host, name, value } = attribute;
        Self {
            id: AttributeRowId::new(),
            host,
            attribute_name: name,
            attribute_value: value,
            recorded_at,
        }
    }

    /// Reconstructs an attribute row from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttributeRowData) -> Self {
        Self {
            id: data.id,
            host: data.host,
            attribute_name: data.attribute_name,
            attribute_value: data.attribute_value,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> AttributeRowId {
        self.id
    }

    /// Returns the host the attribute belongs to.
    #[must_use]
    pub const fn host(&self) -> &HostName {
        &self.host
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Returns the attribute value text.
    #[must_use]
    pub fn attribute_value(&self) -> &str {
        &self.attribute_value
    }

    /// Returns the recording timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Projects flattened triples into attribute rows sharing one timestamp.
#[must_use]
pub fn rows_from_flat(
    attributes: Vec<FlatAttribute>,
    recorded_at: DateTime<Utc>,
) -> Vec<AttributeRow> {
    attributes
        .into_iter()
        .map(|attribute| AttributeRow::from_flat(attribute, recorded_at))
        .collect()
}
