//! Orchestration for creating, listing, patching, and deleting critical
//! points.

use crate::critical_point::{
    domain::{
        AttributeName, CriticalPoint, CriticalPointDomainError, CriticalPointPatch, Thresholds,
    },
    ports::{CriticalPointRepository, CriticalPointRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a critical point.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCriticalPointRequest {
    attribute_name: String,
    thresholds: Thresholds,
}

impl CreateCriticalPointRequest {
    /// Creates a request for the given attribute with no thresholds.
    #[must_use]
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            thresholds: Thresholds::new(),
        }
    }

    /// Sets the thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// Service-level errors for critical point operations.
#[derive(Debug, Error)]
pub enum CriticalPointServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CriticalPointDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CriticalPointRepositoryError),
}

/// Result type for critical point service operations.
pub type CriticalPointServiceResult<T> = Result<T, CriticalPointServiceError>;

/// Critical point registry coordinator.
pub struct CriticalPointRegistryService<R, C>
where
    R: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for CriticalPointRegistryService<R, C>
where
    R: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> CriticalPointRegistryService<R, C>
where
    R: CriticalPointRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new critical point.
    ///
    /// # Errors
    ///
    /// Returns domain errors for invalid names or thresholds, and
    /// [`CriticalPointRepositoryError::Duplicate`] when the attribute name is
    /// already registered.
    pub async fn create(
        &self,
        request: CreateCriticalPointRequest,
    ) -> CriticalPointServiceResult<CriticalPoint> {
        let name = AttributeName::new(request.attribute_name)?;
        let point = CriticalPoint::new(name, request.thresholds, &*self.clock)?;
        self.repository.create(&point).await?;
        info!(attribute = %point.attribute_name(), "created critical point");
        Ok(point)
    }

    /// Returns one page of critical points, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> CriticalPointServiceResult<Vec<CriticalPoint>> {
        Ok(self.repository.list(offset, limit).await?)
    }

    /// Applies a partial update to a critical point.
    ///
    /// Only the fields supplied in `patch` change.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointRepositoryError::NotFound`] when the attribute
    /// name is not registered, and domain errors when the patched thresholds
    /// are invalid.
    pub async fn update(
        &self,
        attribute_name: &str,
        patch: &CriticalPointPatch,
    ) -> CriticalPointServiceResult<CriticalPoint> {
        let name = AttributeName::new(attribute_name)?;
        let mut point = self
            .repository
            .find(&name)
            .await?
            .ok_or_else(|| CriticalPointRepositoryError::NotFound(name.clone()))?;

        point.apply_patch(patch)?;
        self.repository.update(&point).await?;
        info!(attribute = %name, "updated critical point");
        Ok(point)
    }

    /// Removes a critical point.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalPointRepositoryError::NotFound`] when the attribute
    /// name is not registered.
    pub async fn delete(&self, attribute_name: &str) -> CriticalPointServiceResult<()> {
        let name = AttributeName::new(attribute_name)?;
        self.repository.delete(&name).await?;
        info!(attribute = %name, "deleted critical point");
        Ok(())
    }
}
