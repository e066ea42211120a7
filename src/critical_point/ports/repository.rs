//! Repository port for critical point persistence.

use crate::critical_point::domain::{AttributeName, CriticalPoint};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for critical point repository operations.
pub type CriticalPointRepositoryResult<T> = Result<T, CriticalPointRepositoryError>;

/// Persistence contract for critical points, keyed by attribute name.
#[async_trait]
pub trait CriticalPointRepository: Send + Sync {
    /// Stores a new critical point.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointRepositoryError::Duplicate`] when a critical
    /// point with the same attribute name already exists.
    async fn create(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()>;

    /// Returns one page of critical points ordered by creation time.
    async fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> CriticalPointRepositoryResult<Vec<CriticalPoint>>;

    /// Finds a critical point by attribute name.
    async fn find(
        &self,
        name: &AttributeName,
    ) -> CriticalPointRepositoryResult<Option<CriticalPoint>>;

    /// Overwrites the thresholds of an existing critical point.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointRepositoryError::NotFound`] when no critical
    /// point has this attribute name.
    async fn update(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()>;

    /// Removes a critical point.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointRepositoryError::NotFound`] when no critical
    /// point has this attribute name.
    async fn delete(&self, name: &AttributeName) -> CriticalPointRepositoryResult<()>;
}

/// Errors returned by critical point repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CriticalPointRepositoryError {
    /// A critical point with the same attribute name already exists.
    #[error("critical point already exists: {0}")]
    Duplicate(AttributeName),

    /// No critical point has the attribute name.
    #[error("critical point not found: {0}")]
    NotFound(AttributeName),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted critical point data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CriticalPointRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for CriticalPointRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
