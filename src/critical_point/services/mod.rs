//! Service layer for critical point registry operations.

mod registry;

pub use registry::{
    CreateCriticalPointRequest, CriticalPointRegistryService, CriticalPointServiceError,
    CriticalPointServiceResult,
};
