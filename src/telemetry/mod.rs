//! Host telemetry ingestion for hostwatch.
//!
//! This module receives schema-less telemetry payloads, keeps a verbatim copy
//! of each one, and projects it into flat `(host, attribute, value)` rows that
//! can be filtered by host, attribute name, value, and recording time. Bulk
//! imports feed spreadsheet rows through the same path. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
