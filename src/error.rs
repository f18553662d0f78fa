//! Error types for the catalog server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access denied: missing authority {required_authority}")]
    Authorization { required_authority: String },

    #[error("Book with ISBN {isbn} not found")]
    BookNotFound { isbn: String },

    #[error("Book with ISBN {isbn} already exists")]
    BookAlreadyExists { isbn: String },

    #[error("Book with ISBN {isbn} was modified by another request")]
    ConcurrencyConflict { isbn: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable error kind rendered in response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "unauthenticated",
            AppError::Authorization { .. } => "forbidden",
            AppError::BookNotFound { .. } => "book_not_found",
            AppError::BookAlreadyExists { .. } => "book_already_exists",
            AppError::ConcurrencyConflict { .. } => "concurrency_conflict",
            AppError::Validation(_) => "validation_failed",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Authorization { .. } => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::BookNotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BookAlreadyExists { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::ConcurrencyConflict { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, errors.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
