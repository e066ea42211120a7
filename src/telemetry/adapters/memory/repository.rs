//! In-memory repository for raw payloads and attribute rows.

use crate::telemetry::{
    domain::{AttributeFilter, AttributeRow, HostName, RawRecord, row_order},
    ports::{
        AllDeletionSummary, HostDeletionSummary, TelemetryRepository, TelemetryRepositoryError,
        TelemetryRepositoryResult,
    },
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory telemetry repository.
///
/// Rows are kept in insertion order and sorted by
/// [`row_order`](crate::telemetry::domain::row_order) when queried.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTelemetryRepository {
    state: Arc<RwLock<InMemoryTelemetryState>>,
}

#[derive(Debug, Default)]
struct InMemoryTelemetryState {
    raw_records: Vec<RawRecord>,
    attributes: Vec<AttributeRow>,
}

impl InMemoryTelemetryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TelemetryRepositoryResult<RwLockReadGuard<'_, InMemoryTelemetryState>> {
        self.state.read().map_err(|err| {
            TelemetryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TelemetryRepositoryResult<RwLockWriteGuard<'_, InMemoryTelemetryState>> {
        self.state.write().map_err(|err| {
            TelemetryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn count_as_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn remove_host_rows(state: &mut InMemoryTelemetryState, host: &HostName) -> HostDeletionSummary {
    let attributes_before = state.attributes.len();
    state.attributes.retain(|row| row.host() != host);
    let raw_before = state.raw_records.len();
    state.raw_records.retain(|record| record.host() != host);

    HostDeletionSummary {
        attributes_deleted: count_as_u64(attributes_before - state.attributes.len()),
        raw_records_deleted: count_as_u64(raw_before - state.raw_records.len()),
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryTelemetryRepository {
    async fn store_raw(&self, record: &RawRecord) -> TelemetryRepositoryResult<()> {
        let mut state = self.write()?;
        if state
            .raw_records
            .iter()
            .any(|existing| existing.id() == record.id())
        {
            return Err(TelemetryRepositoryError::DuplicateRawRecord(record.id()));
        }
        state.raw_records.push(record.clone());
        Ok(())
    }

    async fn store_attributes(&self, rows: &[AttributeRow]) -> TelemetryRepositoryResult<()> {
        let mut state = self.write()?;
        state.attributes.extend_from_slice(rows);
        Ok(())
    }

    async fn latest_raw_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Option<RawRecord>> {
        let state = self.read()?;
        // `max_by_key` keeps the last maximum, so later inserts win ties.
        let latest = state
            .raw_records
            .iter()
            .filter(|record| record.host() == host)
            .max_by_key(|record| record.received_at())
            .cloned();
        Ok(latest)
    }

    async fn raw_records_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<RawRecord>> {
        let state = self.read()?;
        let mut records: Vec<RawRecord> = state
            .raw_records
            .iter()
            .filter(|record| record.host() == host)
            .cloned()
            .collect();
        records.sort_by_key(RawRecord::received_at);
        Ok(records)
    }

    async fn replace_host_snapshot(
        &self,
        record: &RawRecord,
        rows: &[AttributeRow],
    ) -> TelemetryRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .raw_records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
            .ok_or(TelemetryRepositoryError::RawRecordNotFound(record.id()))?;
        *stored = record.clone();

        state.attributes.retain(|row| row.host() != record.host());
        state.attributes.extend_from_slice(rows);
        Ok(())
    }

    async fn attributes_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>> {
        let state = self.read()?;
        let mut matching: Vec<AttributeRow> = state
            .attributes
            .iter()
            .filter(|row| row.host() == host)
            .cloned()
            .collect();
        matching.sort_by(row_order);
        Ok(matching)
    }

    async fn find_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>> {
        let state = self.read()?;
        let mut matching: Vec<AttributeRow> = state
            .attributes
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        matching.sort_by(row_order);
        Ok(filter.paginate(matching))
    }

    async fn count_attributes_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64> {
        let state = self.read()?;
        let count = state
            .attributes
            .iter()
            .filter(|row| row.host() == host)
            .count();
        Ok(count_as_u64(count))
    }

    async fn count_raw_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64> {
        let state = self.read()?;
        let count = state
            .raw_records
            .iter()
            .filter(|record| record.host() == host)
            .count();
        Ok(count_as_u64(count))
    }

    async fn delete_host(&self, host: &HostName) -> TelemetryRepositoryResult<HostDeletionSummary> {
        let mut state = self.write()?;
        Ok(remove_host_rows(&mut state, host))
    }

    async fn delete_all(&self) -> TelemetryRepositoryResult<AllDeletionSummary> {
        let mut state = self.write()?;
        let summary = AllDeletionSummary {
            attributes_deleted: count_as_u64(state.attributes.len()),
            raw_records_deleted: count_as_u64(state.raw_records.len()),
        };
        state.attributes.clear();
        state.raw_records.clear();
        Ok(summary)
    }
}
