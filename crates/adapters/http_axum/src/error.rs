//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use thermohub_domain::error::ThermohubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ThermohubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ThermohubError);

impl From<ThermohubError> for ApiError {
    fn from(err: ThermohubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ThermohubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ThermohubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ThermohubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
