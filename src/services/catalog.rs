//! Book catalog service (plain reads)

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
