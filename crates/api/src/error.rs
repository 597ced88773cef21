use atrium_core::error::CoreError;
use atrium_db::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::content::FetchError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atrium_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A content store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A content fetch that failed outside the resolver.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or wrong shared secret.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Config(msg)) => {
                tracing::error!(error = %msg, "Site configuration error");
                internal()
            }

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            AppError::Fetch(err) => match err {
                FetchError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                FetchError::Timeout(_) => {
                    tracing::error!(error = %err, "Content store timed out");
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "STORE_TIMEOUT",
                        "The content store did not respond in time".to_string(),
                    )
                }
                FetchError::Store(store) => classify_store_error(store),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - An unreachable store maps to 503.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Database(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        StoreError::Database(sqlx::Error::PoolTimedOut) | StoreError::Unavailable(_) => {
            tracing::error!(error = %err, "Content store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The content store is unavailable".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Content store error");
            internal()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
