use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON-bodied API error: explicit status plus `{"error", "detail"}` body.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = self.title, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({"error": self.title, "detail": self.detail});
        (self.status, Json(body)).into_response()
    }
}

/// Service error kinds map onto client-visible statuses here, at the
/// transport boundary. Duplicate names are a modeled 409, not a 500.
impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::Model(m) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(m.to_string()))
            }
            ServiceError::NotFound(msg) => {
                JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg))
            }
            ServiceError::Conflict(msg) => {
                JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg))
            }
            ServiceError::Storage(msg) => {
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(msg))
            }
        }
    }
}
