//! Critical point registry for hostwatch.
//!
//! A critical point is a named threshold definition keyed by a telemetry
//! attribute name. Points are created, listed, partially updated, and deleted;
//! nothing evaluates incoming telemetry against them.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
