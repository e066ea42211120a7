//! Step definitions for host ingestion scenarios.

mod given;
mod then;
mod when;
