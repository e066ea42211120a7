//! Port contracts for critical point persistence.

mod repository;

pub use repository::{
    CriticalPointRepository, CriticalPointRepositoryError, CriticalPointRepositoryResult,
};
