//! Error types for the library server

use std::time::Duration;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Stable machine codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StockEmpty = 1,
    QuotaExceeded = 2,
    AlreadyBorrowed = 3,
    TransactionFailed = 4,
    NotFound = 5,
    InvalidInput = 6,
    AlreadyReturned = 7,
}

impl ErrorCode {
    /// Stable string form, e.g. `STOCK_EMPTY`
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::StockEmpty => "STOCK_EMPTY",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::AlreadyBorrowed => "ALREADY_BORROWED",
            ErrorCode::TransactionFailed => "TRANSACTION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::AlreadyReturned => "ALREADY_RETURNED",
        }
    }

    /// Reference code carried over from the previous loan API, e.g. `ZYD-ERR-001`
    pub fn reference(self) -> &'static str {
        match self {
            ErrorCode::StockEmpty => "ZYD-ERR-001",
            ErrorCode::QuotaExceeded => "ZYD-ERR-002",
            ErrorCode::AlreadyBorrowed => "ZYD-ERR-003",
            ErrorCode::TransactionFailed => "ZYD-ERR-004",
            ErrorCode::NotFound => "ZYD-ERR-005",
            ErrorCode::InvalidInput => "ZYD-ERR-006",
            ErrorCode::AlreadyReturned => "ZYD-ERR-007",
        }
    }

    /// Response category for the transport layer
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::StockEmpty
            | ErrorCode::QuotaExceeded
            | ErrorCode::AlreadyBorrowed
            | ErrorCode::AlreadyReturned => StatusCode::CONFLICT,
            ErrorCode::TransactionFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Member {member_id} already has {limit} active loans")]
    QuotaExceeded { member_id: i32, limit: i64 },

    #[error("Book {book_id} is out of stock")]
    StockEmpty { book_id: i32 },

    #[error("Member {member_id} is already borrowing book {book_id}")]
    AlreadyBorrowed { member_id: i32, book_id: i32 },

    #[error("Loan {loan_id} was already returned")]
    AlreadyReturned { loan_id: i32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Operation did not complete within {0:?}")]
    Timeout(Duration),
}

impl AppError {
    /// Classification of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            AppError::StockEmpty { .. } => ErrorCode::StockEmpty,
            AppError::AlreadyBorrowed { .. } => ErrorCode::AlreadyBorrowed,
            AppError::AlreadyReturned { .. } => ErrorCode::AlreadyReturned,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Database(_) | AppError::Timeout(_) => ErrorCode::TransactionFailed,
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::QuotaExceeded { limit, .. } => {
                format!("Member has reached the maximum of {} active loans", limit)
            }
            AppError::StockEmpty { .. } => "Book is out of stock".to_string(),
            AppError::AlreadyBorrowed { .. } => "Member is already borrowing this book".to_string(),
            AppError::AlreadyReturned { .. } => "Book was already returned".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Database(_) => "Database transaction failed".to_string(),
            AppError::Timeout(_) => "Database transaction timed out".to_string(),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    /// `ZYD-ERR-00N` reference code
    pub error_code: String,
    pub message: String,
    pub trace_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let trace_id = Uuid::new_v4().simple().to_string();

        match &self {
            AppError::Database(e) => {
                tracing::error!(%trace_id, error = ?e, "Database error");
            }
            AppError::Timeout(limit) => {
                tracing::error!(%trace_id, ?limit, "Loan operation timed out");
            }
            other => {
                tracing::debug!(%trace_id, code = code.as_str(), "{}", other);
            }
        }

        let body = Json(ErrorResponse {
            code: code as u32,
            error: code.as_str().to_string(),
            error_code: code.reference().to_string(),
            message: self.public_message(),
            trace_id,
        });

        (code.status(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
