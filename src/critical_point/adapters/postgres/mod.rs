//! `PostgreSQL` adapters for critical point persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CriticalPointPgPool, PostgresCriticalPointRepository};
