//! HTTP error mapping.

use crate::critical_point::{ports::CriticalPointRepositoryError, services::CriticalPointServiceError};
use crate::telemetry::{
    ports::{TabularSourceError, TelemetryRepositoryError},
    services::TelemetryServiceError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure returned by an HTTP handler, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was malformed or failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Storage or another server-side dependency failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Builds an [`ApiError::InvalidRequest`] from any displayable value.
    pub fn invalid(reason: impl ToString) -> Self {
        Self::InvalidRequest(reason.to_string())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if matches!(self, Self::Storage(_)) {
            error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<TelemetryServiceError> for ApiError {
    fn from(err: TelemetryServiceError) -> Self {
        match err {
            TelemetryServiceError::HostNotFound { .. } => Self::NotFound(err.to_string()),
            TelemetryServiceError::Domain(_) => Self::invalid(err),
            TelemetryServiceError::Repository(TelemetryRepositoryError::RawRecordNotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            TelemetryServiceError::Repository(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<CriticalPointServiceError> for ApiError {
    fn from(err: CriticalPointServiceError) -> Self {
        match err {
            CriticalPointServiceError::Domain(_) => Self::invalid(err),
            CriticalPointServiceError::Repository(CriticalPointRepositoryError::NotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            CriticalPointServiceError::Repository(CriticalPointRepositoryError::Duplicate(_)) => {
                Self::Conflict(err.to_string())
            }
            CriticalPointServiceError::Repository(_) => Self::Storage(err.to_string()),
        }
    }
}

impl From<TabularSourceError> for ApiError {
    fn from(err: TabularSourceError) -> Self {
        Self::invalid(err)
    }
}
