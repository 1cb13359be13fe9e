//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use fieldops_domain::error::FieldOpsError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl ErrorBody {
    pub(crate) fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (status, Json(Self { error: error.into() })).into_response()
    }
}

/// Maps [`FieldOpsError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(FieldOpsError);

impl From<FieldOpsError> for ApiError {
    fn from(err: FieldOpsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            FieldOpsError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            FieldOpsError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            FieldOpsError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        ErrorBody::response(status, message)
    }
}
