//! Hostwatch: host telemetry ingestion and attribute normalisation.
//!
//! Hosts submit schema-less JSON payloads describing their configuration.
//! Each payload is kept verbatim and projected into flat
//! `(host, attribute, value)` rows that can be filtered by host, attribute
//! name, value, and recording time. Spreadsheets carrying one payload per row
//! can be bulk imported, and operators can register threshold definitions
//! ("critical points") per attribute.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, files, etc.)
//!
//! # Modules
//!
//! - [`telemetry`]: Payload ingestion, flattening, querying, and import
//! - [`critical_point`]: Threshold definition registry
//! - [`server`]: HTTP routes, configuration, and error mapping
//! - [`logging`]: Tracing subscriber set-up

pub mod critical_point;
pub mod logging;
pub mod server;
pub mod telemetry;

use crate::server::{Server, config::AppConfig};

/// Starts the HTTP service using environment configuration.
///
/// # Errors
///
/// Returns an error when configuration is invalid, the database cannot be
/// reached, or the listener fails.
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    Server::new(config).await?.run().await
}
