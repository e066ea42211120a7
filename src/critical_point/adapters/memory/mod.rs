//! In-memory adapters for critical point persistence.

mod repository;

pub use repository::InMemoryCriticalPointRepository;
