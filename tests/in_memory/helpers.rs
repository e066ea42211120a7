//! Shared helpers for in-memory integration tests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use hostwatch::critical_point::{
    adapters::memory::InMemoryCriticalPointRepository, services::CriticalPointRegistryService,
};
use hostwatch::server::{config::CriticalPointPaging, router, state::AppState};
use hostwatch::telemetry::{
    adapters::memory::InMemoryTelemetryRepository,
    services::{TelemetryImportService, TelemetryIngestionService},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router state backed by the in-memory adapters.
pub type InMemoryState =
    AppState<InMemoryTelemetryRepository, InMemoryCriticalPointRepository, DefaultClock>;

/// Response status and decoded JSON body.
pub struct JsonResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Decoded body, `Value::Null` when empty.
    pub body: Value,
}

/// Builds router state over fresh in-memory repositories.
pub fn in_memory_state(paging: CriticalPointPaging) -> InMemoryState {
    let clock = Arc::new(DefaultClock);
    let ingestion = TelemetryIngestionService::new(
        Arc::new(InMemoryTelemetryRepository::new()),
        Arc::clone(&clock),
    );
    let import = TelemetryImportService::new(ingestion.clone());
    let critical_points =
        CriticalPointRegistryService::new(Arc::new(InMemoryCriticalPointRepository::new()), clock);
    AppState::new(ingestion, import, critical_points, paging)
}

/// Provides a router over fresh in-memory repositories.
#[fixture]
pub fn app() -> Router {
    router(in_memory_state(CriticalPointPaging::default()))
}

/// Sends one request and decodes the JSON response.
///
/// # Errors
///
/// Returns an error when the request cannot be built or served, or when the
/// body is not JSON.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<JsonResponse, eyre::Report> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    send_request(app, request).await
}

/// Sends a prepared request and decodes the JSON response.
///
/// # Errors
///
/// Returns an error when the request cannot be served or the body is not
/// JSON.
pub async fn send_request(
    app: &Router,
    request: Request<Body>,
) -> Result<JsonResponse, eyre::Report> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok(JsonResponse { status, body })
}

/// Builds a multipart upload request with one file field.
///
/// # Errors
///
/// Returns an error when the request cannot be built.
pub fn multipart_upload(
    field: &str,
    file_name: &str,
    contents: &[u8],
) -> Result<Request<Body>, eyre::Report> {
    let boundary = "hostwatch-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Ok(Request::builder()
        .method(Method::POST)
        .uri("/upload-excel/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))?)
}
