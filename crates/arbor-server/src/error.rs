//! Error types for the HTTP server.

use arbor_client::PathError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request path is not a valid site path.
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidPath(e) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid path", "detail": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
