//! Error types for PaperClub
//!
//! Provides the error handling system shared by every engine operation:
//! - Distinct error variants for each named failure
//! - A coarse taxonomy (validation, not found, conflict, store)
//! - Stable numeric codes for callers
//! - The `(status, payload)` outcome handed to the web layer

use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input, e.g. an empty tag
    Validation,
    /// Credentials did not match
    Unauthorized,
    /// Referenced entity is absent
    NotFound,
    /// Duplicate registration, duplicate like, self-like, unlike without like
    Conflict,
    /// Underlying store failure
    Store,
}

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,

    // Authentication errors (2xxx)
    WrongPassword,

    // Resource errors (4xxx)
    UserNotFound,
    PaperNotFound,

    // Conflict errors (5xxx)
    UsernameTaken,
    SelfLike,
    AlreadyLiked,
    NotLiked,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error. Zero is reserved for success.
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,

            ErrorCode::WrongPassword => 2001,

            ErrorCode::UserNotFound => 4001,
            ErrorCode::PaperNotFound => 4002,

            ErrorCode::UsernameTaken => 5001,
            ErrorCode::SelfLike => 5002,
            ErrorCode::AlreadyLiked => 5003,
            ErrorCode::NotLiked => 5004,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Wrong password for user {username}")]
    WrongPassword { username: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("Paper not found: {pid}")]
    PaperNotFound { pid: i32 },

    #[error("Username already taken: {username}")]
    UsernameTaken { username: String },

    #[error("User {username} cannot like their own paper {pid}")]
    SelfLike { username: String, pid: i32 },

    #[error("User {username} already liked paper {pid}")]
    AlreadyLiked { username: String, pid: i32 },

    #[error("User {username} has not liked paper {pid}")]
    NotLiked { username: String, pid: i32 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl AppError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::WrongPassword { .. } => ErrorCode::WrongPassword,
            AppError::UserNotFound { .. } => ErrorCode::UserNotFound,
            AppError::PaperNotFound { .. } => ErrorCode::PaperNotFound,
            AppError::UsernameTaken { .. } => ErrorCode::UsernameTaken,
            AppError::SelfLike { .. } => ErrorCode::SelfLike,
            AppError::AlreadyLiked { .. } => ErrorCode::AlreadyLiked,
            AppError::NotLiked { .. } => ErrorCode::NotLiked,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
        }
    }

    /// Get the taxonomy member for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } => ErrorKind::Validation,

            AppError::WrongPassword { .. } => ErrorKind::Unauthorized,

            AppError::UserNotFound { .. } |
            AppError::PaperNotFound { .. } => ErrorKind::NotFound,

            AppError::UsernameTaken { .. } |
            AppError::SelfLike { .. } |
            AppError::AlreadyLiked { .. } |
            AppError::NotLiked { .. } => ErrorKind::Conflict,

            AppError::Database(_) |
            AppError::DatabaseConnection { .. } |
            AppError::Internal { .. } |
            AppError::Configuration { .. } => ErrorKind::Store,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_store_error(&self) -> bool {
        self.kind() == ErrorKind::Store
    }

    /// Check if this error was caused by the caller's input or the current state
    pub fn is_client_error(&self) -> bool {
        !self.is_store_error()
    }

    /// Narrow a store failure to the named error it stands for, if any.
    ///
    /// `on_unique` and `on_foreign_key` build the replacement error; anything
    /// else stays a generic database error.
    pub fn narrow(
        err: DbErr,
        on_unique: impl FnOnce() -> Option<AppError>,
        on_foreign_key: impl FnOnce() -> Option<AppError>,
    ) -> Self {
        let narrowed = match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => on_unique(),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => on_foreign_key(),
            _ => None,
        };
        narrowed.unwrap_or(AppError::Database(err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
        fields.sort();

        AppError::Validation {
            message: errors.to_string(),
            field: fields.into_iter().next(),
        }
    }
}

/// Two-part outcome of an engine operation.
///
/// `status` is 0 on success and the failure's [`ErrorCode`] otherwise; the
/// payload is present only on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    pub status: u16,
    pub payload: Option<T>,
}

impl<T> Outcome<T> {
    pub const SUCCESS: u16 = 0;

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    pub fn into_parts(self) -> (u16, Option<T>) {
        (self.status, self.payload)
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => Outcome {
                status: Self::SUCCESS,
                payload: Some(payload),
            },
            Err(err) => {
                let code = err.code();

                if err.is_store_error() {
                    tracing::error!(error = %err, code = ?code, "Store error");
                } else {
                    tracing::warn!(error = %err, code = ?code, "Operation rejected");
                }

                Outcome {
                    status: code.as_code(),
                    payload: None,
                }
            }
        }
    }
}
