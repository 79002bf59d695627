//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client errors
    #[error("{0}")]
    Validation(String),

    #[error("a user with that email already exists")]
    DuplicateEmail,

    #[error("a user with that username already exists")]
    DuplicateUsername,

    /// Also covers wrong, expired and already-redeemed activation tokens.
    #[error("Resource not found")]
    NotFound,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Email delivery failed: {0}")]
    Delivery(String),

    /// Cleanup after a failed delivery did not go through. The user row is
    /// orphaned and needs manual remediation.
    #[error("Compensation for user {user_id} failed: {reason}")]
    Compensation { user_id: i64, reason: String },

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::DuplicateUsername => "DUPLICATE_USERNAME",
            AppError::NotFound => "NOT_FOUND",
            AppError::Hashing(_) => "HASHING_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Delivery(_) => "DELIVERY_ERROR",
            AppError::Compensation { .. } => "COMPENSATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateEmail | AppError::DuplicateUsername => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Hashing(_)
            | AppError::Database(_)
            | AppError::Delivery(_)
            | AppError::Compensation { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::DuplicateEmail | AppError::DuplicateUsername => self.to_string(),

            // Hide details for internal/security errors
            AppError::Hashing(msg) => {
                tracing::error!("Hashing error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Delivery(msg) => {
                tracing::error!("Delivery error: {}", msg);
                "The activation email could not be delivered".to_string()
            }
            AppError::Compensation { user_id, reason } => {
                tracing::error!(user_id, "Compensation error: {}", reason);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Generic text only, so token guessing learns nothing
            AppError::NotFound => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn compensation(user_id: i64, reason: impl Into<String>) -> Self {
        AppError::Compensation {
            user_id,
            reason: reason.into(),
        }
    }
}
