//! Domain model for critical point threshold definitions.

mod error;
mod name;
mod point;

pub use error::CriticalPointDomainError;
pub use name::AttributeName;
pub use point::{CriticalPoint, CriticalPointPatch, PersistedCriticalPointData, Thresholds};
