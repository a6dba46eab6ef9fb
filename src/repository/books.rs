//! Book ledger: book rows and atomic stock adjustment

use sqlx::{Pool, Postgres};

use super::tx::Tx;
use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, without locking
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, stock FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Get book by ID and hold an exclusive row lock until the transaction ends
    pub async fn get_by_id_for_update(&self, tx: &mut Tx, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, stock FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(book)
    }

    /// List all books ordered by title
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, stock FROM books ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Add `delta` to the stock of a book in a single statement.
    ///
    /// Decrements carry a `stock > 0` guard, so the row count tells whether the
    /// update applied: zero rows means the book is missing (increment) or has
    /// no copy left (decrement).
    pub async fn adjust_stock(&self, tx: &mut Tx, id: i32, delta: i32) -> AppResult<()> {
        if delta == 0 {
            return Err(AppError::InvalidInput("Stock adjustment must not be zero".to_string()));
        }

        let query = if delta < 0 {
            "UPDATE books SET stock = stock + $1 WHERE id = $2 AND stock > 0"
        } else {
            "UPDATE books SET stock = stock + $1 WHERE id = $2"
        };

        let result = sqlx::query(query)
            .bind(delta)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(if delta < 0 {
                AppError::StockEmpty { book_id: id }
            } else {
                AppError::NotFound(format!("Book with id {} not found", id))
            });
        }

        Ok(())
    }

    /// Take one copy out of stock
    pub async fn decrement_stock(&self, tx: &mut Tx, id: i32) -> AppResult<()> {
        self.adjust_stock(tx, id, -1).await
    }

    /// Put one copy back in stock
    pub async fn increment_stock(&self, tx: &mut Tx, id: i32) -> AppResult<()> {
        self.adjust_stock(tx, id, 1).await
    }
}
