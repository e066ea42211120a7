//! Diesel row models for critical point persistence.

use super::schema::critical_points;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for critical points.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = critical_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CriticalPointRow {
    /// Attribute name key.
    pub attribute_name: String,
    /// Lower bound.
    pub min_value: Option<f64>,
    /// Upper bound.
    pub max_value: Option<f64>,
    /// Exact expected value.
    pub exact_value: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for critical points.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = critical_points)]
pub struct NewCriticalPointRow {
    /// Attribute name key.
    pub attribute_name: String,
    /// Lower bound.
    pub min_value: Option<f64>,
    /// Upper bound.
    pub max_value: Option<f64>,
    /// Exact expected value.
    pub exact_value: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
