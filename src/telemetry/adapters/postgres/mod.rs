//! `PostgreSQL` adapters for telemetry persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTelemetryRepository, TelemetryPgPool};
