//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - HTTP-facing error enum
//! - [`AppResponse`] - API response envelope
//!
//! Engine errors ([`CatalogError`]) map onto HTTP statuses here; expected
//! conditions (limit reached, invalid rank, insufficient stock) keep their
//! messages so the admin surface can name the violated constraint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::catalog::CatalogError;
use crate::db::GatewayError;

/// API response envelope
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code ("0000" on success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Showcase/featured cap reached (409)
    #[error("{0}")]
    LimitExceeded(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds stock (409)
    #[error("{0}")]
    InsufficientStock(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn database(message: impl Into<String>) -> Self {
        AppError::Database(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E1001"),
            AppError::LimitExceeded(_) => (StatusCode::CONFLICT, "E1002"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E1003"),
            AppError::InsufficientStock(_) => (StatusCode::CONFLICT, "E1004"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9002"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9001"),
        };
        if status.is_server_error() {
            error!(code, "request failed: {self}");
        }
        let body = AppResponse::<()> {
            code: code.to_string(),
            message: self.to_string(),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(_) | CatalogError::InvalidRank { .. } => {
                AppError::Validation(err.to_string())
            }
            CatalogError::LimitExceeded { .. } => AppError::LimitExceeded(err.to_string()),
            CatalogError::NotFound(resource) => AppError::NotFound(resource),
            CatalogError::InsufficientStock { .. } => AppError::InsufficientStock(err.to_string()),
            CatalogError::Inconsistent(message) => AppError::Internal(message),
            CatalogError::Store(GatewayError::NotFound(resource)) => AppError::NotFound(resource),
            CatalogError::Store(store) => AppError::Database(store.to_string()),
        }
    }
}

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;
