//! Repository port for raw payload and attribute row persistence.

use crate::telemetry::domain::{AttributeFilter, AttributeRow, HostName, RawRecord, RawRecordId};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Result type for telemetry repository operations.
pub type TelemetryRepositoryResult<T> = Result<T, TelemetryRepositoryError>;

/// Number of rows removed when a host is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HostDeletionSummary {
    /// Attribute rows removed.
    pub attributes_deleted: u64,
    /// Raw records removed.
    pub raw_records_deleted: u64,
}

/// Number of rows removed when both stores are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AllDeletionSummary {
    /// Attribute rows removed.
    pub attributes_deleted: u64,
    /// Raw records removed.
    pub raw_records_deleted: u64,
}

/// Persistence contract for raw payloads and their attribute projection.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Stores a new raw record.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryRepositoryError::DuplicateRawRecord`] when the
    /// identifier already exists.
    async fn store_raw(&self, record: &RawRecord) -> TelemetryRepositoryResult<()>;

    /// Stores attribute rows.
    async fn store_attributes(&self, rows: &[AttributeRow]) -> TelemetryRepositoryResult<()>;

    /// Finds the most recently received raw record for a host.
    async fn latest_raw_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Option<RawRecord>>;

    /// Returns every raw record stored for a host, oldest first.
    async fn raw_records_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<RawRecord>>;

    /// Overwrites an existing raw record and replaces every attribute row of
    /// its host with `rows`, as one atomic change.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryRepositoryError::RawRecordNotFound`] when the raw
    /// record does not exist; nothing is changed in that case.
    async fn replace_host_snapshot(
        &self,
        record: &RawRecord,
        rows: &[AttributeRow],
    ) -> TelemetryRepositoryResult<()>;

    /// Returns every attribute row for a host, in [`row_order`].
    ///
    /// [`row_order`]: crate::telemetry::domain::row_order
    async fn attributes_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>>;

    /// Returns attribute rows matching a filter, in [`row_order`], with the
    /// filter's `offset` and `limit` applied to that order.
    ///
    /// [`row_order`]: crate::telemetry::domain::row_order
    async fn find_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>>;

    /// Counts attribute rows stored for a host.
    async fn count_attributes_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64>;

    /// Counts raw records stored for a host.
    async fn count_raw_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64>;

    /// Removes every attribute row and raw record of a host in one atomic
    /// change.
    async fn delete_host(&self, host: &HostName) -> TelemetryRepositoryResult<HostDeletionSummary>;

    /// Removes every attribute row and raw record in one atomic change.
    async fn delete_all(&self) -> TelemetryRepositoryResult<AllDeletionSummary>;
}

/// Errors returned by telemetry repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TelemetryRepositoryError {
    /// A raw record with the same identifier already exists.
    #[error("duplicate raw record identifier: {0}")]
    DuplicateRawRecord(RawRecordId),

    /// The raw record was not found.
    #[error("raw record not found: {0}")]
    RawRecordNotFound(RawRecordId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted telemetry data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TelemetryRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TelemetryRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
