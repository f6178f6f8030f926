//! Health check and fallback handlers.

use axum::http::StatusCode;

use crate::errors::AppError;

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health check passed")
    )
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Fallback when no static front-end is configured.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
