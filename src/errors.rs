use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use utoipa::ToSchema;

use crate::dto::FieldErrors;
use crate::repositories::RepositoryError;
use crate::telemetry::current_request_id;

/// Body returned for every domain or operational failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "detail": "product not found" }))]
pub struct DetailResponse {
    /// Human-readable error description
    #[serde(alias = "Detail")]
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Domain errors raised by the product service.
///
/// The display text is what clients see. The storage failure behind it is
/// kept as the error source so it can be logged without being leaked.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to fetch product list")]
    ListUnavailable(#[source] RepositoryError),

    #[error("product not found")]
    NotFound(#[source] RepositoryError),

    #[error("product could not be updated")]
    UpdateFailed(#[source] RepositoryError),

    #[error("an error occurred while deleting the product")]
    DeleteFailed(#[source] RepositoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Returns the message sent to clients in the `detail` field.
    pub fn response_message(&self) -> String {
        self.to_string()
    }
}

/// API error type for HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("{error}")]
    Service {
        status: StatusCode,
        #[source]
        error: ServiceError,
    },
}

impl ApiError {
    pub fn bad_request(error: ServiceError) -> Self {
        Self::Service {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    pub fn not_found(error: ServiceError) -> Self {
        Self::Service {
            status: StatusCode::NOT_FOUND,
            error,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Service { status, .. } => *status,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBody(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::MalformedBody(_) => {
                tracing::debug!(error = %self, "rejected request body");
                (status, Json(DetailResponse::new(self.to_string()))).into_response()
            }
            ApiError::Service { error, .. } => {
                let request_id = current_request_id().map(|id| id.0).unwrap_or_default();
                match error.source() {
                    Some(cause) => tracing::warn!(
                        request_id = %request_id,
                        status = status.as_u16(),
                        error = %error,
                        cause = %cause,
                        "product request failed"
                    ),
                    None => tracing::warn!(
                        request_id = %request_id,
                        status = status.as_u16(),
                        error = %error,
                        "product request failed"
                    ),
                }
                (status, Json(DetailResponse::new(error.response_message()))).into_response()
            }
        }
    }
}
