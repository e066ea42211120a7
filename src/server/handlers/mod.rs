//! Request handlers and their wire representations.

pub mod critical_points;
mod filter_query;
pub mod telemetry;

pub use filter_query::parse_filter_query;
