//! Service layer for telemetry ingestion, querying, and deletion.

use crate::telemetry::{
    domain::{
        AttributeFilter, AttributeRow, HostName, ListPolicy, RawRecord, TelemetryDomainError,
        TelemetryPayload, flatten, rows_from_flat,
    },
    ports::{
        AllDeletionSummary, HostDeletionSummary, TelemetryRepository, TelemetryRepositoryError,
    },
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Store in which a host lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryStore {
    /// The flattened attribute row store.
    Attributes,
    /// The verbatim raw payload store.
    RawPayloads,
}

impl fmt::Display for TelemetryStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Attributes => "attribute",
            Self::RawPayloads => "raw payload",
        })
    }
}

/// Service-level errors for telemetry operations.
#[derive(Debug, Error)]
pub enum TelemetryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TelemetryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TelemetryRepositoryError),
    /// The host has no rows in the given store.
    #[error("host {host} not found in the {store} store")]
    HostNotFound {
        /// Host that was looked up.
        host: HostName,
        /// Store that had no rows for the host.
        store: TelemetryStore,
    },
}

/// Result type for telemetry service operations.
pub type TelemetryServiceResult<T> = Result<T, TelemetryServiceError>;

/// Telemetry ingestion coordinator.
///
/// The create path stores the raw payload before flattening it, so a payload
/// that fails to flatten still leaves its raw record committed. The update
/// path flattens first and then swaps the raw payload and attribute rows in
/// one repository transaction.
pub struct TelemetryIngestionService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TelemetryIngestionService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TelemetryIngestionService<R, C>
where
    R: TelemetryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new ingestion service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Ingests one payload, keeping list values as one serialized row.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryServiceError::Domain`] when the payload cannot be
    /// flattened (the raw record has been stored by then) or repository
    /// errors.
    pub async fn ingest(&self, payload: TelemetryPayload) -> TelemetryServiceResult<RawRecord> {
        self.ingest_with_policy(payload, ListPolicy::Serialize)
            .await
    }

    /// Ingests one payload using the given list policy.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryServiceError::Domain`] when the host is invalid
    /// (nothing is stored) or the payload cannot be flattened (the raw record
    /// has been stored by then), and repository errors.
    pub async fn ingest_with_policy(
        &self,
        payload: TelemetryPayload,
        policy: ListPolicy,
    ) -> TelemetryServiceResult<RawRecord> {
        let host = payload.host()?;
        let record = RawRecord::new(host, payload, &*self.clock);
        self.repository.store_raw(&record).await?;

        let flattened = flatten(record.host(), record.payload(), policy)?;
        let rows = rows_from_flat(flattened, record.received_at());
        self.repository.store_attributes(&rows).await?;

        debug!(
            host = %record.host(),
            attributes = rows.len(),
            policy = policy.as_str(),
            "ingested telemetry payload"
        );
        Ok(record)
    }

    /// Ingests a batch of payloads in order, stopping at the first failure.
    ///
    /// Payloads ingested before a failure stay committed.
    ///
    /// # Errors
    ///
    /// Returns the first ingestion error encountered.
    pub async fn ingest_batch(
        &self,
        payloads: Vec<TelemetryPayload>,
    ) -> TelemetryServiceResult<usize> {
        let mut ingested = 0;
        for payload in payloads {
            self.ingest(payload).await?;
            ingested += 1;
        }
        info!(payloads = ingested, "ingested telemetry batch");
        Ok(ingested)
    }

    /// Replaces the latest raw payload of a host and re-projects its
    /// attribute rows.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryServiceError::HostNotFound`] when the host has no
    /// raw record, domain errors when the host name is empty or the payload
    /// cannot be flattened, and repository errors.
    pub async fn update(
        &self,
        host: &str,
        payload: TelemetryPayload,
    ) -> TelemetryServiceResult<RawRecord> {
        let host_name = HostName::new(host)?;
        let mut record = self
            .repository
            .latest_raw_for_host(&host_name)
            .await?
            .ok_or_else(|| TelemetryServiceError::HostNotFound {
                host: host_name.clone(),
                store: TelemetryStore::RawPayloads,
            })?;

        let flattened = flatten(&host_name, &payload, ListPolicy::Serialize)?;
        record.replace_payload(payload, &*self.clock);
        let rows = rows_from_flat(flattened, record.received_at());
        self.repository.replace_host_snapshot(&record, &rows).await?;

        info!(host = %host_name, attributes = rows.len(), "replaced host telemetry");
        Ok(record)
    }

    /// Returns every attribute row of a host; unknown hosts yield no rows.
    ///
    /// # Errors
    ///
    /// Returns domain errors when the host name is empty and repository
    /// errors.
    pub async fn attributes_for_host(
        &self,
        host: &str,
    ) -> TelemetryServiceResult<Vec<AttributeRow>> {
        let host_name = HostName::new(host)?;
        Ok(self.repository.attributes_for_host(&host_name).await?)
    }

    /// Returns every raw record of a host, oldest first.
    ///
    /// # Errors
    ///
    /// Returns domain errors when the host name is empty and repository
    /// errors.
    pub async fn raw_records_for_host(&self, host: &str) -> TelemetryServiceResult<Vec<RawRecord>> {
        let host_name = HostName::new(host)?;
        Ok(self.repository.raw_records_for_host(&host_name).await?)
    }

    /// Returns attribute rows matching a filter.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> TelemetryServiceResult<Vec<AttributeRow>> {
        Ok(self.repository.find_attributes(filter).await?)
    }

    /// Removes every attribute row and raw record of a host.
    ///
    /// The attribute store is checked first, then the raw payload store.
    /// Both checks run before anything is deleted, so a failed call leaves
    /// both stores untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryServiceError::HostNotFound`] naming the first store
    /// without rows for the host, domain errors when the host name is empty,
    /// and repository errors.
    pub async fn delete_host(&self, host: &str) -> TelemetryServiceResult<HostDeletionSummary> {
        let host_name = HostName::new(host)?;

        if self.repository.count_attributes_for_host(&host_name).await? == 0 {
            return Err(TelemetryServiceError::HostNotFound {
                host: host_name,
                store: TelemetryStore::Attributes,
            });
        }
        if self.repository.count_raw_for_host(&host_name).await? == 0 {
            return Err(TelemetryServiceError::HostNotFound {
                host: host_name,
                store: TelemetryStore::RawPayloads,
            });
        }

        let summary = self.repository.delete_host(&host_name).await?;
        info!(
            host = %host_name,
            attributes = summary.attributes_deleted,
            raw_records = summary.raw_records_deleted,
            "deleted host telemetry"
        );
        Ok(summary)
    }

    /// Removes every attribute row and raw record.
    ///
    /// # Errors
    ///
    /// Returns repository errors; the repository rolls back on failure.
    pub async fn delete_all(&self) -> TelemetryServiceResult<AllDeletionSummary> {
        let summary = self.repository.delete_all().await?;
        info!(
            attributes = summary.attributes_deleted,
            raw_records = summary.raw_records_deleted,
            "deleted all telemetry"
        );
        Ok(summary)
    }
}
