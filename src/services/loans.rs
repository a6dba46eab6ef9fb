//! Loan transaction engine: borrow and return as single atomic transactions

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{format_timestamp, Loan, LoanDetail, LoanStatus},
    },
    repository::{
        tx::{self, Tx},
        Repository,
    },
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for a member.
    ///
    /// Runs in one transaction: member check, locked quota count, locked book
    /// read, duplicate check, conditional stock decrement, loan insert. Any
    /// failure rolls everything back; so does dropping the returned future.
    #[tracing::instrument(skip(self))]
    pub async fn borrow(&self, member_id: i32, book_id: i32) -> AppResult<LoanDetail> {
        let mut tx = tx::begin(&self.repository.pool, self.config.isolation_level).await?;
        let result = self.borrow_in(&mut tx, member_id, book_id).await;

        match tx::finish(tx, result).await {
            Ok(detail) => {
                tracing::info!(loan_id = detail.loan_id, "Book borrowed");
                Ok(detail)
            }
            Err(err) => {
                log_rejection(&err);
                Err(err)
            }
        }
    }

    /// Return a borrowed book.
    ///
    /// The loan row is locked before its state is checked, so two concurrent
    /// returns of the same loan cannot both put the copy back in stock.
    #[tracing::instrument(skip(self))]
    pub async fn return_book(&self, member_id: i32, book_id: i32) -> AppResult<()> {
        let mut tx = tx::begin(&self.repository.pool, self.config.isolation_level).await?;
        let result = self.return_in(&mut tx, member_id, book_id).await;

        match tx::finish(tx, result).await {
            Ok(loan_id) => {
                tracing::info!(loan_id, "Book returned");
                Ok(())
            }
            Err(err) => {
                log_rejection(&err);
                Err(err)
            }
        }
    }

    async fn borrow_in(&self, tx: &mut Tx, member_id: i32, book_id: i32) -> AppResult<LoanDetail> {
        let repo = &self.repository;

        repo.members
            .get_by_id_in(tx, member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", member_id)))?;

        // Member checks run before the book row is locked
        let active = repo.loans.count_active_for_member(tx, member_id).await?;
        ensure_quota(member_id, active, self.config.max_active_loans)?;

        let book = repo.books.get_by_id_for_update(tx, book_id).await?;
        let book = ensure_available(book, book_id)?;

        if repo.loans.has_active_loan(tx, member_id, book_id).await? {
            return Err(AppError::AlreadyBorrowed { member_id, book_id });
        }

        repo.books.decrement_stock(tx, book_id).await?;
        let (loan_id, borrowed_at) = repo.loans.create(tx, member_id, book_id).await?;

        Ok(LoanDetail {
            loan_id,
            member_id,
            book_id,
            book_title: book.title,
            book_author: book.author,
            borrowed_at: format_timestamp(borrowed_at, &self.config.display_offset()),
        })
    }

    async fn return_in(&self, tx: &mut Tx, member_id: i32, book_id: i32) -> AppResult<i32> {
        let repo = &self.repository;

        let loan = repo.loans.get_for_update(tx, member_id, book_id).await?;
        let loan = ensure_returnable(loan, member_id, book_id)?;

        repo.loans.mark_returned(tx, loan.id).await?;
        // No book lock: the loan lock above already rules out a second return
        repo.books.increment_stock(tx, book_id).await?;

        Ok(loan.id)
    }
}

fn ensure_quota(member_id: i32, active: i64, limit: i64) -> AppResult<()> {
    if active >= limit {
        return Err(AppError::QuotaExceeded { member_id, limit });
    }
    Ok(())
}

fn ensure_available(book: Option<Book>, book_id: i32) -> AppResult<Book> {
    let book = book.ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;
    if !book.in_stock() {
        return Err(AppError::StockEmpty { book_id });
    }
    Ok(book)
}

fn ensure_returnable(loan: Option<Loan>, member_id: i32, book_id: i32) -> AppResult<Loan> {
    let loan = loan.ok_or_else(|| {
        AppError::NotFound(format!("Member {} has no loan of book {}", member_id, book_id))
    })?;
    if loan.status() == LoanStatus::Returned {
        return Err(AppError::AlreadyReturned { loan_id: loan.id });
    }
    Ok(loan)
}

fn log_rejection(err: &AppError) {
    match err {
        AppError::Database(e) => tracing::error!(error = %e, "Loan transaction failed"),
        other => tracing::debug!(code = other.code().as_str(), "Loan request rejected: {}", other),
    }
}
