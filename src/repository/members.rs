//! Member directory (read-only)

use sqlx::{Executor, Pool, Postgres};

use super::tx::Tx;
use crate::{error::AppResult, models::member::Member};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Member>> {
        fetch_member(&self.pool, id).await
    }

    /// Same lookup on the transaction's connection, without locking
    pub async fn get_by_id_in(&self, tx: &mut Tx, id: i32) -> AppResult<Option<Member>> {
        fetch_member(&mut **tx, id).await
    }
}

async fn fetch_member<'e, E>(executor: E, id: i32) -> AppResult<Option<Member>>
where
    E: Executor<'e, Database = Postgres>,
{
    let member = sqlx::query_as::<_, Member>("SELECT id, name, email FROM members WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(member)
}
