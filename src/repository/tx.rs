//! Transaction helpers shared by the ledgers

use std::fmt;

use serde::Deserialize;
use sqlx::{Executor, Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Transaction handle threaded through every ledger call of one atomic unit
pub type Tx = Transaction<'static, Postgres>;

/// Isolation level requested when a transaction starts.
///
/// REPEATABLE READ is not offered: its snapshot predates the member row
/// lock, so the quota count would miss loans committed while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Begin a transaction at the given isolation level.
///
/// Dropping the returned guard without committing rolls the transaction
/// back, which is what happens when the caller's future is cancelled.
pub async fn begin(pool: &Pool<Postgres>, level: IsolationLevel) -> AppResult<Tx> {
    let mut tx = pool.begin().await?;

    // Must be the first statement of the transaction
    let statement = format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql());
    (&mut *tx).execute(statement.as_str()).await?;

    Ok(tx)
}

/// Commit on success, roll back on failure, and hand the result back.
///
/// A failed rollback is logged; the workflow error is still returned.
pub async fn finish<T>(tx: Tx, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
