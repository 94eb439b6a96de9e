//! Structured error type for HTTP handler responses.

use crate::db::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

/// Error codes, each tied to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation errors (400)
    MissingRequiredField,
    InvalidFieldValue,

    // Server errors (500)
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredField | ErrorCode::InvalidFieldValue => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error returned from a request handler.
#[derive(Debug)]
pub struct WebError {
    pub code: ErrorCode,
    pub message: String,
    pub field: Option<String>,
}

impl WebError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidFieldValue,
            format!("invalid {}: {}", field, reason),
        )
        .with_field(field)
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    pub fn is_validation(&self) -> bool {
        self.status() == StatusCode::BAD_REQUEST
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WebError {}

impl From<StorageError> for WebError {
    fn from(err: StorageError) -> Self {
        WebError::database(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.is_validation() {
            tracing::debug!(code = ?self.code, field = ?self.field, "rejected request: {}", self.message);
        } else {
            tracing::error!(code = ?self.code, "request failed: {}", self.message);
        }
        (self.status(), self.message).into_response()
    }
}

/// Result type for handler operations.
pub type WebResult<T> = std::result::Result<T, WebError>;
