//! Member service: loan history

use chrono::FixedOffset;

use crate::{
    error::{AppError, AppResult},
    models::loan::{LoanHistoryItem, MemberLoans},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
    display_offset: FixedOffset,
}

impl MembersService {
    pub fn new(repository: Repository, display_offset: FixedOffset) -> Self {
        Self {
            repository,
            display_offset,
        }
    }

    /// Full loan history of a member, most recent first
    pub async fn loan_history(&self, member_id: i32) -> AppResult<MemberLoans> {
        let member = self
            .repository
            .members
            .get_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", member_id)))?;

        let loans: Vec<LoanHistoryItem> = self
            .repository
            .loans
            .list_by_member(member_id)
            .await?
            .into_iter()
            .map(|row| LoanHistoryItem::from_row(row, &self.display_offset))
            .collect();

        Ok(MemberLoans {
            member_id: member.id,
            member_name: member.name,
            total_loans: loans.len(),
            loans,
        })
    }
}
