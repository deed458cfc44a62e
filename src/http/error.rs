//! HTTP error translation.
//!
//! Three outcomes matter to clients: validation failures (400, with
//! itemized field complaints), not-found conditions (404, a normal lookup
//! outcome), and backend failures (500, logged here and surfaced with a
//! generic message). Nothing is fatal to the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationError;
use crate::storage::StorageError;

/// Errors produced by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation.
    #[error("invalid {entity} data")]
    Validation {
        /// Lowercase entity noun for the error message.
        entity: &'static str,
        /// The itemized field complaints.
        source: ValidationError,
    },

    /// Path id was not a positive integer.
    #[error("invalid {0} id")]
    InvalidId(&'static str),

    /// No record with the requested id.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Wrap a validation failure for the given entity noun.
    #[must_use]
    pub fn validation(entity: &'static str, source: ValidationError) -> Self {
        Self::Validation { entity, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation { entity, source } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Invalid {entity} data"),
                    "details": source.errors,
                })),
            )
                .into_response(),
            Self::InvalidId(entity) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid {entity} ID") })),
            )
                .into_response(),
            Self::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{entity} not found") })),
            )
                .into_response(),
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
