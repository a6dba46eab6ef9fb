//! Loan model and related types

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Display format for timestamps returned to clients
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from_returned_at(self.returned_at)
    }
}

/// Loan row joined with its book, used for member history
#[derive(Debug, Clone, FromRow)]
pub struct LoanHistoryRow {
    pub id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub book_title: String,
    pub book_author: String,
}

/// Derived loan status, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn from_returned_at(returned_at: Option<DateTime<Utc>>) -> Self {
        match returned_at {
            Some(_) => LoanStatus::Returned,
            None => LoanStatus::Active,
        }
    }
}

/// Result of a successful borrow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetail {
    pub loan_id: i32,
    pub member_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    /// Borrow time in the display timezone (`YYYY-MM-DD HH:MM:SS`)
    pub borrowed_at: String,
}

/// Single entry of a member's loan history
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanHistoryItem {
    pub loan_id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    pub borrowed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<String>,
    pub status: LoanStatus,
}

impl LoanHistoryItem {
    pub fn from_row(row: LoanHistoryRow, offset: &FixedOffset) -> Self {
        Self {
            loan_id: row.id,
            book_id: row.book_id,
            book_title: row.book_title,
            book_author: row.book_author,
            borrowed_at: format_timestamp(row.borrowed_at, offset),
            returned_at: row.returned_at.map(|at| format_timestamp(at, offset)),
            status: LoanStatus::from_returned_at(row.returned_at),
        }
    }
}

/// Loan history of a member, returned and active loans alike
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberLoans {
    pub member_id: i32,
    pub member_name: String,
    pub total_loans: usize,
    pub loans: Vec<LoanHistoryItem>,
}

/// Format a stored UTC timestamp in the given display offset
pub fn format_timestamp(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format(DISPLAY_FORMAT).to_string()
}
