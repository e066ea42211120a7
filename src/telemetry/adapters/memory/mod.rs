//! In-memory adapters for telemetry persistence.

mod repository;

pub use repository::InMemoryTelemetryRepository;
