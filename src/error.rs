//! Error types for the Tool Crib server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    StorageFailure = 3,
    NoSuchTool = 4,
    NoUnitsAvailable = 5,
    ToolInUse = 6,
    Duplicate = 7,
    BadValue = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No units available: {0}")]
    NoUnitsAvailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Tool in use: {0}")]
    ToolInUse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and error code for this error
    pub fn status(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NoUnitsAvailable(_) => (StatusCode::CONFLICT, ErrorCode::NoUnitsAvailable),
            AppError::Unauthorized(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::ToolInUse(_) => (StatusCode::CONFLICT, ErrorCode::ToolInUse),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchTool),
            AppError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::StorageFailure)
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let message = match &self {
            AppError::StorageUnavailable(e) => {
                tracing::error!("Storage error: {:?}", e);
                "Storage unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::NoUnitsAvailable(msg)
            | AppError::Unauthorized(msg)
            | AppError::ToolInUse(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NoUnitsAvailable("x".into()).status(),
            (StatusCode::CONFLICT, ErrorCode::NoUnitsAvailable)
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status().0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::StorageUnavailable(sqlx::Error::PoolTimedOut).status().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_storage_error_hides_details() {
        let response = AppError::StorageUnavailable(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
