//! Book catalog endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::book::Book, AppState};

/// Book list payload
#[derive(Serialize, ToSchema)]
pub struct BookList {
    pub total: usize,
    pub books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub message: String,
    pub data: BookList,
}

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub data: Book,
}

/// List all books with their available stock
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = BookListResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BookListResponse>> {
    let books = state.services.catalog.list_books().await?;

    Ok(Json(BookListResponse {
        message: "Books retrieved successfully".to_string(),
        data: BookList {
            total: books.len(),
            books,
        },
    }))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 400, description = "Invalid book ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<BookResponse>> {
    let Path(id) = id?;
    let book = state.services.catalog.get_book(id).await?;

    Ok(Json(BookResponse {
        message: "Book retrieved successfully".to_string(),
        data: book,
    }))
}
