//! Error types and response handling for page markers.
//!
//! Every variant is fatal for the request being handled. Handlers return
//! them as-is and axum renders the JSON error body.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum MarkerError {
    /// The page name resolved to an empty string.
    #[error("Invalid marker name: '{raw}' normalizes to an empty identifier")]
    InvalidIdentity { raw: String },

    /// Request metadata needed to derive identity or URL is missing.
    #[error("Missing request context: {field}")]
    MissingRequestContext { field: &'static str },

    /// The session backend could not be read or written.
    #[error("State store unavailable: {0}")]
    StoreUnavailable(#[from] SessionError),
}

impl MarkerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarkerError::InvalidIdentity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MarkerError::MissingRequestContext { .. } => StatusCode::BAD_REQUEST,
            MarkerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            MarkerError::InvalidIdentity { .. } => "invalid_identity",
            MarkerError::MissingRequestContext { .. } => "missing_request_context",
            MarkerError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl IntoResponse for MarkerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Page marker failed");

        let body = serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        });

        (
            self.status_code(),
            [(CONTENT_TYPE, "application/json")],
            Body::from(body.to_string()),
        )
            .into_response()
    }
}
