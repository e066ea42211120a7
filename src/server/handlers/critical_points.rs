//! Handlers for the critical point registry.

use crate::critical_point::{
    domain::{CriticalPoint, CriticalPointPatch, Thresholds},
    ports::CriticalPointRepository,
    services::CreateCriticalPointRequest,
};
use super::filter_query::checked_count;
use crate::server::{
    error::{ApiError, ApiResult},
    state::AppState,
};
use crate::telemetry::ports::TelemetryRepository;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Body of a critical point creation request.
#[derive(Debug, Deserialize)]
pub struct CreateCriticalPointBody {
    /// Attribute name the thresholds apply to.
    #[serde(alias = "attribute_name")]
    pub param: String,
    /// Lower bound.
    #[serde(default)]
    pub min_value: Option<f64>,
    /// Upper bound.
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Exact expected value.
    #[serde(default)]
    pub exact_value: Option<f64>,
}

/// Body of a partial update.
///
/// A field that is absent keeps its stored value; a field set to `null`
/// clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCriticalPointBody {
    /// Attribute name; when present it must match the path.
    #[serde(default, alias = "attribute_name")]
    pub param: Option<String>,
    /// Replacement lower bound.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub min_value: Option<Option<f64>>,
    /// Replacement upper bound.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub max_value: Option<Option<f64>>,
    /// Replacement exact value.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub exact_value: Option<Option<f64>>,
}

impl UpdateCriticalPointBody {
    fn to_patch(&self) -> CriticalPointPatch {
        CriticalPointPatch {
            min_value: self.min_value,
            max_value: self.max_value,
            exact_value: self.exact_value,
        }
    }
}

/// Pagination parameters for listing critical points.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Number of points to skip.
    #[serde(default)]
    pub skip: Option<usize>,
    /// Page size, capped by configuration.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Wire form of a critical point.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CriticalPointResponse {
    /// Attribute name the thresholds apply to.
    pub param: String,
    /// Lower bound.
    pub min_value: Option<f64>,
    /// Upper bound.
    pub max_value: Option<f64>,
    /// Exact expected value.
    pub exact_value: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<CriticalPoint> for CriticalPointResponse {
    fn from(point: CriticalPoint) -> Self {
        Self {
            param: point.attribute_name().as_str().to_owned(),
            min_value: point.min_value(),
            max_value: point.max_value(),
            exact_value: point.exact_value(),
            created_at: point.created_at(),
        }
    }
}

/// Confirmation of a critical point deletion.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCriticalPointResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// `POST /critical-points/`: registers a critical point.
pub async fn create<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Json(body): Json<CreateCriticalPointBody>,
) -> ApiResult<Json<CriticalPointResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = CreateCriticalPointRequest::new(body.param).with_thresholds(Thresholds {
        min_value: body.min_value,
        max_value: body.max_value,
        exact_value: body.exact_value,
    });
    let point = state.critical_points.create(request).await?;
    Ok(Json(point.into()))
}

/// `GET /critical-points/`: lists one page of critical points.
pub async fn list<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<CriticalPointResponse>>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let skip = checked_count("skip", params.skip.unwrap_or(0))?;
    let limit = state.paging.resolve(params.limit);
    let points = state.critical_points.list(skip, limit).await?;
    Ok(Json(points.into_iter().map(CriticalPointResponse::from).collect()))
}

/// `PUT /critical-points/{param}`: applies a partial threshold update.
pub async fn update<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Path(param): Path<String>,
    Json(body): Json<UpdateCriticalPointBody>,
) -> ApiResult<Json<CriticalPointResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    if let Some(renamed) = body.param.as_deref()
        && renamed.trim() != param.trim()
    {
        return Err(ApiError::invalid(format!(
            "param '{renamed}' does not match the path '{param}'; critical points cannot be renamed"
        )));
    }

    let point = state
        .critical_points
        .update(&param, &body.to_patch())
        .await?;
    Ok(Json(point.into()))
}

/// `DELETE /critical-points/{param}`: removes a critical point.
pub async fn delete<T, P, C>(
    State(state): State<AppState<T, P, C>>,
    Path(param): Path<String>,
) -> ApiResult<Json<DeleteCriticalPointResponse>>
where
    T: TelemetryRepository + 'static,
    P: CriticalPointRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.critical_points.delete(&param).await?;
    Ok(Json(DeleteCriticalPointResponse {
        message: format!("critical point {param} deleted"),
    }))
}
