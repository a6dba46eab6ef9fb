//! Loan ledger: loan rows, quota and duplicate queries

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::tx::Tx;
use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanHistoryRow},
};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Count the member's active loans with those rows locked.
    ///
    /// The member row is locked first: with no active loans there is nothing
    /// to lock in `loans`, and concurrent borrowers of the same member must
    /// still queue here. Under READ COMMITTED the count then runs with a fresh
    /// snapshot, so it sees loans committed by whoever held the lock before us.
    /// Under SERIALIZABLE a stale count fails the transaction instead.
    pub async fn count_active_for_member(&self, tx: &mut Tx, member_id: i32) -> AppResult<i64> {
        sqlx::query("SELECT id FROM members WHERE id = $1 FOR NO KEY UPDATE")
            .bind(member_id)
            .fetch_optional(&mut **tx)
            .await?;

        // FOR UPDATE is not allowed next to an aggregate
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM (
                SELECT id FROM loans
                WHERE member_id = $1 AND returned_at IS NULL
                FOR UPDATE
            ) AS active
            "#,
        )
        .bind(member_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count)
    }

    /// Check whether the member currently borrows this book
    pub async fn has_active_loan(&self, tx: &mut Tx, member_id: i32, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM loans
                WHERE member_id = $1 AND book_id = $2 AND returned_at IS NULL
            )
            "#,
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(exists)
    }

    /// Create an active loan stamped with the database clock at insert time
    pub async fn create(&self, tx: &mut Tx, member_id: i32, book_id: i32) -> AppResult<(i32, DateTime<Utc>)> {
        sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            r#"
            INSERT INTO loans (member_id, book_id, borrowed_at)
            VALUES ($1, $2, clock_timestamp())
            RETURNING id, borrowed_at
            "#,
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::AlreadyBorrowed { member_id, book_id }
            } else {
                AppError::Database(e)
            }
        })
    }

    /// Lock and return the loan of this book by this member.
    ///
    /// The active loan wins if there is one, otherwise the latest returned
    /// loan is returned so the caller can tell "already returned" apart from
    /// "never borrowed".
    pub async fn get_for_update(&self, tx: &mut Tx, member_id: i32, book_id: i32) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT id, member_id, book_id, borrowed_at, returned_at
            FROM loans
            WHERE member_id = $1 AND book_id = $2
            ORDER BY returned_at IS NULL DESC, borrowed_at DESC, id DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(loan)
    }

    /// Set the return timestamp from the statement clock. A loan already
    /// returned keeps its timestamp.
    pub async fn mark_returned(&self, tx: &mut Tx, loan_id: i32) -> AppResult<()> {
        sqlx::query("UPDATE loans SET returned_at = COALESCE(returned_at, clock_timestamp()) WHERE id = $1")
            .bind(loan_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Loan history of a member with book details, most recent first
    pub async fn list_by_member(&self, member_id: i32) -> AppResult<Vec<LoanHistoryRow>> {
        let rows = sqlx::query_as::<_, LoanHistoryRow>(
            r#"
            SELECT l.id, l.member_id, l.book_id, l.borrowed_at, l.returned_at,
                   b.title AS book_title, b.author AS book_author
            FROM loans l
            JOIN books b ON l.book_id = b.id
            WHERE l.member_id = $1
            ORDER BY l.borrowed_at DESC, l.id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
