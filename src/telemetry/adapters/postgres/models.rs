//! Diesel row models for telemetry persistence.

use super::schema::{raw_data, system_info};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for raw payload records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = raw_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RawDataRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Host the payload describes.
    pub host: String,
    /// Payload document.
    pub payload: Value,
    /// Receipt timestamp.
    pub received_at: DateTime<Utc>,
}

/// Insert model for raw payload records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = raw_data)]
pub struct NewRawDataRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Host the payload describes.
    pub host: String,
    /// Payload document.
    pub payload: Value,
    /// Receipt timestamp.
    pub received_at: DateTime<Utc>,
}

/// Query result row for attribute records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = system_info)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SystemInfoRow {
    /// Internal row identifier.
    pub id: uuid::Uuid,
    /// Host the attribute belongs to.
    pub host: String,
    /// Attribute name.
    pub attribute_name: String,
    /// Attribute value text.
    pub attribute_value: String,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for attribute records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = system_info)]
pub struct NewSystemInfoRow {
    /// Internal row identifier.
    pub id: uuid::Uuid,
    /// Host the attribute belongs to.
    pub host: String,
    /// Attribute name.
    pub attribute_name: String,
    /// Attribute value text.
    pub attribute_value: String,
    /// Recording timestamp.
    pub recorded_at: DateTime<Utc>,
}
