//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, members};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Book stock and loan records with transactional borrow and return"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Loans
        loans::borrow_book,
        loans::return_book,
        // Books
        books::list_books,
        books::get_book,
        // Members
        members::get_member_loans,
    ),
    components(
        schemas(
            // Loans
            loans::LoanRequest,
            loans::BorrowResponse,
            loans::ReturnResponse,
            crate::models::loan::LoanDetail,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanHistoryItem,
            crate::models::loan::MemberLoans,
            // Books
            crate::models::book::Book,
            books::BookList,
            books::BookListResponse,
            books::BookResponse,
            // Members
            members::MemberLoansResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "loans", description = "Borrow and return"),
        (name = "books", description = "Book catalog"),
        (name = "members", description = "Member loan history")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
