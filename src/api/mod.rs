//! API handlers for the library REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod members;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Loans
        .route("/borrow", post(loans::borrow_book))
        .route("/return", post(loans::return_book))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        // Members
        .route("/members/:id/loans", get(members::get_member_loans))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
