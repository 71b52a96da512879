//! HTTP error mapping for the observer API.
//!
//! Handlers return [`ObserverError`]; its
//! [`IntoResponse`](axum::response::IntoResponse) impl turns each case
//! into a status code plus a `{"error", "status"}` JSON body, so the
//! dashboard sees one error shape for every route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Why an observer request could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// No zone or history entry matches the request (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Engine state could not be rendered as JSON (500).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A query parameter such as `limit` is out of range (400).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A capture id in the path is not a UUID (400).
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// The scene engine was torn down and refuses history changes (503).
    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

impl ObserverError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidQuery(_) | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}
