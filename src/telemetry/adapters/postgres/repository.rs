//! `PostgreSQL` repository implementation for raw payloads and attribute rows.

use super::{
    models::{NewRawDataRow, NewSystemInfoRow, RawDataRow, SystemInfoRow},
    schema::{raw_data, system_info},
};
use crate::telemetry::{
    domain::{
        AttributeFilter, AttributeRow, AttributeRowId, HostName, PersistedAttributeRowData,
        PersistedRawRecordData, RawRecord, RawRecordId, TelemetryPayload,
    },
    ports::{
        AllDeletionSummary, HostDeletionSummary, TelemetryRepository, TelemetryRepositoryError,
        TelemetryRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::helper_types::Asc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by telemetry adapters.
pub type TelemetryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed telemetry repository.
///
/// Every call checks one connection out of the pool for its duration and
/// returns it on every exit path.
#[derive(Debug, Clone)]
pub struct PostgresTelemetryRepository {
    pool: TelemetryPgPool,
}

impl PostgresTelemetryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TelemetryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> TelemetryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TelemetryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TelemetryRepositoryError::persistence)?;
            operation(&mut connection)
        })
        .await
        .map_err(TelemetryRepositoryError::persistence)?
    }
}

#[async_trait]
impl TelemetryRepository for PostgresTelemetryRepository {
    async fn store_raw(&self, record: &RawRecord) -> TelemetryRepositoryResult<()> {
        let record_id = record.id();
        let new_row = to_new_raw_row(record)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(raw_data::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| raw_insert_error(record_id, err))?;
            Ok(())
        })
        .await
    }

    async fn store_attributes(&self, rows: &[AttributeRow]) -> TelemetryRepositoryResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let new_rows: Vec<NewSystemInfoRow> = rows.iter().map(to_new_attribute_row).collect();

        self.run_blocking(move |connection| {
            diesel::insert_into(system_info::table)
                .values(&new_rows)
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn latest_raw_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Option<RawRecord>> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = raw_data::table
                .filter(raw_data::host.eq(&host_name))
                .order(raw_data::received_at.desc())
                .select(RawDataRow::as_select())
                .first::<RawDataRow>(connection)
                .optional()?;
            row.map(row_to_raw_record).transpose()
        })
        .await
    }

    async fn raw_records_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<RawRecord>> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = raw_data::table
                .filter(raw_data::host.eq(&host_name))
                .order(raw_data::received_at.asc())
                .select(RawDataRow::as_select())
                .load::<RawDataRow>(connection)?;
            rows.into_iter().map(row_to_raw_record).collect()
        })
        .await
    }

    async fn replace_host_snapshot(
        &self,
        record: &RawRecord,
        rows: &[AttributeRow],
    ) -> TelemetryRepositoryResult<()> {
        let record_id = record.id();
        let raw_row = to_new_raw_row(record)?;
        let new_rows: Vec<NewSystemInfoRow> = rows.iter().map(to_new_attribute_row).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TelemetryRepositoryError, _>(|tx_conn| {
                let updated_count =
                    diesel::update(raw_data::table.filter(raw_data::id.eq(raw_row.id)))
                        .set((
                            raw_data::payload.eq(&raw_row.payload),
                            raw_data::received_at.eq(raw_row.received_at),
                        ))
                        .execute(tx_conn)?;
                if updated_count == 0 {
                    return Err(TelemetryRepositoryError::RawRecordNotFound(record_id));
                }

                diesel::delete(system_info::table.filter(system_info::host.eq(&raw_row.host)))
                    .execute(tx_conn)?;
                if !new_rows.is_empty() {
                    diesel::insert_into(system_info::table)
                        .values(&new_rows)
                        .execute(tx_conn)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn attributes_for_host(
        &self,
        host: &HostName,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = system_info::table
                .filter(system_info::host.eq(&host_name))
                .order(row_order_clause())
                .select(SystemInfoRow::as_select())
                .load::<SystemInfoRow>(connection)?;
            rows.into_iter().map(row_to_attribute).collect()
        })
        .await
    }

    async fn find_attributes(
        &self,
        filter: &AttributeFilter,
    ) -> TelemetryRepositoryResult<Vec<AttributeRow>> {
        let filter = filter.clone();
        self.run_blocking(move |connection| {
            let rows = filtered_query(&filter)?.load::<SystemInfoRow>(connection)?;
            rows.into_iter().map(row_to_attribute).collect()
        })
        .await
    }

    async fn count_attributes_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            let count: i64 = system_info::table
                .filter(system_info::host.eq(&host_name))
                .count()
                .get_result(connection)?;
            u64::try_from(count).map_err(TelemetryRepositoryError::persistence)
        })
        .await
    }

    async fn count_raw_for_host(&self, host: &HostName) -> TelemetryRepositoryResult<u64> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            let count: i64 = raw_data::table
                .filter(raw_data::host.eq(&host_name))
                .count()
                .get_result(connection)?;
            u64::try_from(count).map_err(TelemetryRepositoryError::persistence)
        })
        .await
    }

    async fn delete_host(&self, host: &HostName) -> TelemetryRepositoryResult<HostDeletionSummary> {
        let host_name = host.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TelemetryRepositoryError, _>(|tx_conn| {
                let attributes_deleted =
                    diesel::delete(system_info::table.filter(system_info::host.eq(&host_name)))
                        .execute(tx_conn)?;
                let raw_records_deleted =
                    diesel::delete(raw_data::table.filter(raw_data::host.eq(&host_name)))
                        .execute(tx_conn)?;
                Ok(HostDeletionSummary {
                    attributes_deleted: as_u64(attributes_deleted),
                    raw_records_deleted: as_u64(raw_records_deleted),
                })
            })
        })
        .await
    }

    async fn delete_all(&self) -> TelemetryRepositoryResult<AllDeletionSummary> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TelemetryRepositoryError, _>(|tx_conn| {
                let attributes_deleted = diesel::delete(system_info::table).execute(tx_conn)?;
                let raw_records_deleted = diesel::delete(raw_data::table).execute(tx_conn)?;
                Ok(AllDeletionSummary {
                    attributes_deleted: as_u64(attributes_deleted),
                    raw_records_deleted: as_u64(raw_records_deleted),
                })
            })
        })
        .await
    }
}

type BoxedSystemInfoQuery<'a> = system_info::BoxedQuery<'a, diesel::pg::Pg>;

type RowOrder = (
    Asc<system_info::recorded_at>,
    Asc<system_info::host>,
    Asc<system_info::attribute_name>,
    Asc<system_info::attribute_value>,
    Asc<system_info::id>,
);

// Mirrors `row_order`; the text columns use the "C" collation.
fn row_order_clause() -> RowOrder {
    (
        system_info::recorded_at.asc(),
        system_info::host.asc(),
        system_info::attribute_name.asc(),
        system_info::attribute_value.asc(),
        system_info::id.asc(),
    )
}

fn filtered_query(filter: &AttributeFilter) -> TelemetryRepositoryResult<BoxedSystemInfoQuery<'_>> {
    let mut query = system_info::table.into_boxed();

    if !filter.hosts().is_empty() {
        query = query.filter(system_info::host.eq_any(owned(filter.hosts())));
    }
    if !filter.attribute_names().is_empty() {
        query = query.filter(
            system_info::attribute_name.eq_any(owned(filter.attribute_names())),
        );
    }
    if !filter.attribute_values().is_empty() {
        query = query.filter(
            system_info::attribute_value.eq_any(owned(filter.attribute_values())),
        );
    }
    if let Some(start) = filter.start() {
        query = query.filter(system_info::recorded_at.ge(start));
    }
    if let Some(end) = filter.end() {
        query = query.filter(system_info::recorded_at.le(end));
    }

    query = query.order(row_order_clause());

    if let Some(offset) = filter.offset() {
        let rows_to_skip =
            i64::try_from(offset).map_err(TelemetryRepositoryError::persistence)?;
        query = query.offset(rows_to_skip);
    }
    if let Some(limit) = filter.limit() {
        let max_rows = i64::try_from(limit).map_err(TelemetryRepositoryError::persistence)?;
        query = query.limit(max_rows);
    }

    Ok(query)
}

fn raw_insert_error(record_id: RawRecordId, err: DieselError) -> TelemetryRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TelemetryRepositoryError::DuplicateRawRecord(record_id)
        }
        _ => TelemetryRepositoryError::persistence(err),
    }
}

fn owned(values: &std::collections::BTreeSet<String>) -> Vec<String> {
    values.iter().cloned().collect()
}

fn as_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn to_new_raw_row(record: &RawRecord) -> TelemetryRepositoryResult<NewRawDataRow> {
    let payload =
        serde_json::to_value(record.payload()).map_err(TelemetryRepositoryError::persistence)?;

    Ok(NewRawDataRow {
        id: record.id().into_inner(),
        host: record.host().as_str().to_owned(),
        payload,
        received_at: record.received_at(),
    })
}

fn to_new_attribute_row(row: &AttributeRow) -> NewSystemInfoRow {
    NewSystemInfoRow {
        id: row.id().into_inner(),
        host: row.host().as_str().to_owned(),
        attribute_name: row.attribute_name().to_owned(),
        attribute_value: row.attribute_value().to_owned(),
        recorded_at: row.recorded_at(),
    }
}

fn row_to_raw_record(row: RawDataRow) -> TelemetryRepositoryResult<RawRecord> {
    let RawDataRow {
        id,
        host,
        payload,
        received_at,
    } = row;

    let parsed_host = HostName::new(host).map_err(TelemetryRepositoryError::invalid_persisted_data)?;
    let parsed_payload = TelemetryPayload::from_value(payload)
        .map_err(TelemetryRepositoryError::invalid_persisted_data)?;

    Ok(RawRecord::from_persisted(PersistedRawRecordData {
        id: RawRecordId::from_uuid(id),
        host: parsed_host,
        payload: parsed_payload,
        received_at,
    }))
}

fn row_to_attribute(row: SystemInfoRow) -> TelemetryRepositoryResult<AttributeRow> {
    let SystemInfoRow {
        id,
        host,
        attribute_name,
        attribute_value,
        recorded_at,
    } = row;

    let parsed_host = HostName::new(host).map_err(TelemetryRepositoryError::invalid_persisted_data)?;

    Ok(AttributeRow::from_persisted(PersistedAttributeRowData {
        id: AttributeRowId::from_uuid(id),
        host: parsed_host,
        attribute_name,
        attribute_value,
        recorded_at,
    }))
}
