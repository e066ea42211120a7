//! Handlers for telemetry ingestion, queries, deletion, and bulk import.

use super::parse_filter_query;
use crate::critical_point::ports::CriticalPointRepository;
use crate::server::{
    error::{ApiError, ApiResult},
    state::AppState,
};
use crate::telemetry::{
    adapters::SpreadsheetSource,
    domain::{AttributeRow, FailedImportRow, TelemetryPayload},
    ports::{TabularSource, TelemetryRepository},
};
use axum::{
    Json,
    extract::{Multipart, Path, RawQuery, State},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field carrying the uploaded workbook.
pub const UPLOAD_FIELD: &str = "file";

/// Body of a batch ingestion request.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Payloads to ingest, in order.
    pub data: Vec<Value>,
}

/// Confirmation of a batch ingestion.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Number of payloads ingested.
    pub ingested: usize,
}

/// Confirmation of a host update.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Host whose telemetry was replaced.
    pub host: String,
    /// New receipt timestamp of the replaced payload.
    pub received_at: DateTime<Utc>,
}

/// Wire form of one attribute row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeRowResponse {
    /// Row identifier.
    pub id: String,
    /// Host the attribute belongs to.
    pub host: String,
    /// Attribute name.
    pub param: String,
    /// Attribute value text.
    pub value: String,
    /// Recording timestamp.
    pub time_date: DateTime<Utc>,
}

impl From<AttributeRow> for AttributeRowResponse {
    fn from(row: AttributeRow) -> Self {
        Self {
            id: row.id().to_string(),
            host: row.host().as_str().to_owned(),
            param: row.attribute_name().to_owned(),
            value: row.attribute_value().to_owned(),
            time_date: row.recorded_at(),
        }
    }
}

/// Confirmation of a deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletionResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Attribute rows removed.
    pub attributes_deleted: u64,
    /// Raw records removed.
    pub raw_records_deleted: u64,
}

/// Outcome of a spreadsheet upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Rows ingested.
    pub processed_count: usize,
    /// Number of rows skipped.
    pub failed_count: usize,
    /// Rows skipped, in file order.
    pub failed_rows: Vec<FailedImportRow>,
}

fn rows_response(rows: Vec<AttributeRow>) -> Json<Vec<AttributeRowResponse>> {
    Json(rows.into_iter().map(AttributeRowResponse::from).collect())
}

/// `POST /post-data/`: ingests a batch of payloads in order.
///
/// Every element must be a JSON object; the batch is rejected before any
/// ingestion when one is not.
pub async fn post_data<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Json(request): Json<IngestRequest>,
) -> ApiResult<Json<IngestResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let payloads = request
        .data
        .into_iter()
        .map(TelemetryPayload::from_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::invalid)?;

    let ingested = state.ingestion.ingest_batch(payloads).await?;
    Ok(Json(IngestResponse {
        message: "telemetry ingested".to_owned(),
        ingested,
    }))
}

/// `PUT /update-data/{host}`: replaces the latest payload of a host.
pub async fn update_data<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Path(host): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<UpdateResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let payload = TelemetryPayload::from_value(body).map_err(ApiError::invalid)?;
    let record = state.ingestion.update(&host, payload).await?;
    Ok(Json(UpdateResponse {
        message: format!("telemetry for {host} updated"),
        host: record.host().as_str().to_owned(),
        received_at: record.received_at(),
    }))
}

/// `GET /get-data/{host}`: lists every attribute row of a host.
pub async fn get_data<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Path(host): Path<String>,
) -> ApiResult<Json<Vec<AttributeRowResponse>>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let rows = state.ingestion.attributes_for_host(&host).await?;
    Ok(rows_response(rows))
}

/// `GET /get-filtered-system-info/`: lists attribute rows matching the
/// query-string filter.
pub async fn get_filtered_system_info<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<AttributeRowResponse>>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let filter = parse_filter_query(query.as_deref())?;
    let rows = state.ingestion.find_attributes(&filter).await?;
    Ok(rows_response(rows))
}

/// `DELETE /delete-data/{host}`: removes a host from both stores.
pub async fn delete_data<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Path(host): Path<String>,
) -> ApiResult<Json<DeletionResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.ingestion.delete_host(&host).await?;
    Ok(Json(DeletionResponse {
        message: format!("telemetry for {host} deleted"),
        attributes_deleted: summary.attributes_deleted,
        raw_records_deleted: summary.raw_records_deleted,
    }))
}

/// `DELETE /delete-all-data/`: clears both stores.
pub async fn delete_all_data<T, P, C>(
    State(state): State<AppState<T, P, C>>,
) -> ApiResult<Json<DeletionResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let summary = state.ingestion.delete_all().await?;
    Ok(Json(DeletionResponse {
        message: "all telemetry deleted".to_owned(),
        attributes_deleted: summary.attributes_deleted,
        raw_records_deleted: summary.raw_records_deleted,
    }))
}

/// `POST /upload-excel/`: imports the `JSON` column of an uploaded workbook.
pub async fn upload_excel<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(ApiError::invalid)? {
        if field.name() == Some(UPLOAD_FIELD) {
            upload = Some(field.bytes().await.map_err(ApiError::invalid)?);
            break;
        }
    }
    let bytes = upload
        .ok_or_else(|| ApiError::invalid(format!("multipart field '{UPLOAD_FIELD}' is required")))?;

    // Workbook parsing is CPU-bound.
    let rows = tokio::task::spawn_blocking(move || {
        SpreadsheetSource::from_bytes(bytes.to_vec()).json_rows()
    })
    .await
    .map_err(|err| ApiError::Storage(err.to_string()))??;

    let report = state.import.import_rows(rows).await;
    Ok(Json(UploadResponse {
        message: "file processed".to_owned(),
        processed_count: report.processed_count,
        failed_count: report.failed_rows.len(),
        failed_rows: report.failed_rows,
    }))
}
