//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use acctl_domain::error::AcCtlError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`AcCtlError`] to an HTTP response with appropriate status code.
pub struct ApiError(AcCtlError);

impl From<AcCtlError> for ApiError {
    fn from(err: AcCtlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AcCtlError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AcCtlError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            // Substrate and line failures are an operator concern; the
            // detail stays in the log.
            AcCtlError::Storage(source) | AcCtlError::Hardware(source) => {
                tracing::error!(kind = %self.0, error = %source, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
