//! Member endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::MemberLoans, AppState};

#[derive(Serialize, ToSchema)]
pub struct MemberLoansResponse {
    pub message: String,
    pub data: MemberLoans,
}

/// Loan history of a member
#[utoipa::path(
    get,
    path = "/members/{id}/loans",
    tag = "members",
    params(
        ("id" = i32, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member loan history", body = MemberLoansResponse),
        (status = 400, description = "Invalid member ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Member not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_member_loans(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MemberLoansResponse>> {
    let Path(member_id) = id?;
    let history = state.services.members.loan_history(member_id).await?;

    Ok(Json(MemberLoansResponse {
        message: "Member loan history retrieved successfully".to_string(),
        data: history,
    }))
}
