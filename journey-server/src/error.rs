//! API error type
//!
//! Every failure is reported as JSON `{"error": ..., "details": ...}`.
//! Details carry the underlying error text; this is a personal service and
//! diagnostics take priority over hiding internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong trigger secret (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Wrong method for this endpoint (405)
    #[error("{0}")]
    MethodNotAllowed(String),

    /// An operation failed; `context` is the client-facing summary (500)
    #[error("{context}: {source}")]
    Operation {
        context: &'static str,
        #[source]
        source: journey_common::Error,
    },
}

impl ApiError {
    /// `map_err` adapter attaching a client-facing summary
    pub fn during(context: &'static str) -> impl FnOnce(journey_common::Error) -> ApiError {
        move |source| ApiError::Operation { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::MethodNotAllowed(msg) => {
                (StatusCode::METHOD_NOT_ALLOWED, json!({ "error": msg }))
            }
            // Configuration problems are reported as-is so the operator sees what to set
            ApiError::Operation {
                source: journey_common::Error::Config(msg),
                ..
            } => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
            ApiError::Operation { context, source } => {
                tracing::error!("{}: {}", context, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": context, "details": source.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
