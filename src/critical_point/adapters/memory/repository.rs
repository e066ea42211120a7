//! In-memory repository for critical points.

use crate::critical_point::{
    domain::{AttributeName, CriticalPoint},
    ports::{CriticalPointRepository, CriticalPointRepositoryError, CriticalPointRepositoryResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory critical point repository.
///
/// Points are kept in insertion order, which is also creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCriticalPointRepository {
    state: Arc<RwLock<Vec<CriticalPoint>>>,
}

impl InMemoryCriticalPointRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> CriticalPointRepositoryResult<RwLockReadGuard<'_, Vec<CriticalPoint>>> {
        self.state.read().map_err(|err| {
            CriticalPointRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> CriticalPointRepositoryResult<RwLockWriteGuard<'_, Vec<CriticalPoint>>> {
        self.state.write().map_err(|err| {
            CriticalPointRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl CriticalPointRepository for InMemoryCriticalPointRepository {
    async fn create(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()> {
        let mut points = self.write()?;
        if points
            .iter()
            .any(|existing| existing.attribute_name() == point.attribute_name())
        {
            return Err(CriticalPointRepositoryError::Duplicate(
                point.attribute_name().clone(),
            ));
        }
        points.push(point.clone());
        Ok(())
    }

    async fn list(
        &self,
        offset: usize,
        limit: usize,
    ) -> CriticalPointRepositoryResult<Vec<CriticalPoint>> {
        let points = self.read()?;
        Ok(points.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn find(
        &self,
        name: &AttributeName,
    ) -> CriticalPointRepositoryResult<Option<CriticalPoint>> {
        let points = self.read()?;
        Ok(points
            .iter()
            .find(|point| point.attribute_name() == name)
            .cloned())
    }

    async fn update(&self, point: &CriticalPoint) -> CriticalPointRepositoryResult<()> {
        let mut points = self.write()?;
        let slot = points
            .iter_mut()
            .find(|existing| existing.attribute_name() == point.attribute_name())
            .ok_or_else(|| {
                CriticalPointRepositoryError::NotFound(point.attribute_name().clone())
            })?;
        *slot = point.clone();
        Ok(())
    }

    async fn delete(&self, name: &AttributeName) -> CriticalPointRepositoryResult<()> {
        let mut points = self.write()?;
        let before = points.len();
        points.retain(|point| point.attribute_name() != name);
        if points.len() == before {
            return Err(CriticalPointRepositoryError::NotFound(name.clone()));
        }
        Ok(())
    }
}
