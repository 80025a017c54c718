//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `DalError`は`external_message()`・`error_type()`・`status_code()`・`notice()`を提供し、
//! HTTP層はこれらだけを使ってレスポンスを組み立てる。

use axum::http::StatusCode;
use thiserror::Error;

use crate::view::NoticeKind;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// UUID parse error
    #[error("UUID parse error: {0}")]
    UuidParse(#[from] uuid::Error),

    /// Request body could not be read
    #[error("Validation error: {0}")]
    Validation(String),
}

/// data access log error type
#[derive(Debug, Error)]
pub enum DalError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No valid session present
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Dataset reference does not resolve
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// Purpose is blank after trimming
    #[error("Purpose must not be empty")]
    MissingPurpose,

    /// Dataset or purpose absent from a submission
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// Date filter is not `YYYY-MM-DD`
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    /// User filter is neither an integer nor `all`
    #[error("Invalid user filter: {0}")]
    InvalidUserFilter(String),

    /// Ledger write failed and was rolled back
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(String),

    /// Request refused (CSRF or origin check failed)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict error (e.g., duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DalError {
    /// Returns a safe error message for external clients.
    ///
    /// Internal details (SQL errors, file paths) stay in the `Display`
    /// output, which only goes to the server log.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(_) => "Request error",
            Self::InvalidCredentials => "Invalid username or password",
            Self::Unauthenticated(_) => "Authentication required",
            Self::DatasetNotFound(_) => "Dataset not found",
            Self::MissingPurpose => "Purpose is required",
            Self::MissingInput(_) => "Dataset and purpose are required",
            Self::InvalidDateFormat(_) => "Invalid date format",
            Self::InvalidUserFilter(_) => "Invalid user filter",
            Self::Persistence(_) => "Failed to record access",
            Self::Database(_) => "Database error",
            Self::PasswordHash(_) => "Authentication error",
            Self::Jwt(_) => "Authentication error",
            Self::Forbidden(_) => "Forbidden",
            Self::Conflict(_) => "Resource conflict",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the error type string.
    ///
    /// - `invalid_request_error`: Bad request parameters
    /// - `authentication_error`: Auth failures
    /// - `permission_error`: CSRF or origin rejection
    /// - `not_found_error`: Resource not found
    /// - `server_error`: Internal server errors
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Common(_)
            | Self::MissingPurpose
            | Self::MissingInput(_)
            | Self::InvalidDateFormat(_)
            | Self::InvalidUserFilter(_)
            | Self::Conflict(_) => "invalid_request_error",
            Self::InvalidCredentials
            | Self::Unauthenticated(_)
            | Self::PasswordHash(_)
            | Self::Jwt(_) => "authentication_error",
            Self::Forbidden(_) => "permission_error",
            Self::DatasetNotFound(_) => "not_found_error",
            Self::Persistence(_) | Self::Database(_) | Self::Internal(_) => "server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Common(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::DatasetNotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingPurpose => StatusCode::BAD_REQUEST,
            Self::MissingInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            Self::InvalidUserFilter(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Jwt(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 画面に表示するステータスメッセージの種別
    pub fn notice(&self) -> NoticeKind {
        match self {
            Self::Common(CommonError::Validation(_)) => NoticeKind::InvalidSubmission,
            Self::InvalidCredentials => NoticeKind::InvalidCredentials,
            Self::Unauthenticated(_) | Self::Jwt(_) => NoticeKind::LoginRequired,
            Self::DatasetNotFound(_) => NoticeKind::DatasetNotFound,
            Self::MissingPurpose | Self::MissingInput(_) => NoticeKind::MissingInput,
            Self::InvalidUserFilter(_) => NoticeKind::InvalidUserFilter,
            Self::Persistence(_) => NoticeKind::LoggingFailed,
            _ => NoticeKind::RequestFailed,
        }
    }
}

/// Result type alias (Common)
pub type CommonResult<T> = Result<T, CommonError>;

/// Result type alias (data access log)
pub type DalResult<T> = Result<T, DalError>;
