//! Borrow and return endpoints

use std::{future::Future, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::loan::LoanDetail,
    AppState,
};

/// Borrow or return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoanRequest {
    #[validate(range(min = 1, message = "member_id must be greater than 0"))]
    pub member_id: i32,
    #[validate(range(min = 1, message = "book_id must be greater than 0"))]
    pub book_id: i32,
}

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub message: String,
    pub data: LoanDetail,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub message: String,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Member or book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Out of stock, quota reached or already borrowed", body = crate::error::ErrorResponse),
        (status = 500, description = "Transaction failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let Json(request) = payload?;
    request.validate()?;

    let loans = &state.services.loans;
    let detail = within(
        state.config.loans.timeout(),
        loans.borrow(request.member_id, request.book_id),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: "Book borrowed successfully".to_string(),
            data: detail,
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "No loan for this member and book", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse),
        (status = 500, description = "Transaction failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> AppResult<Json<ReturnResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let loans = &state.services.loans;
    within(
        state.config.loans.timeout(),
        loans.return_book(request.member_id, request.book_id),
    )
    .await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
    }))
}

/// Run a loan operation with a deadline. On expiry the operation future is
/// dropped, which rolls its transaction back.
pub async fn within<T, F>(limit: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| AppError::Timeout(limit))?
}
