//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book record with its available stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Number of copies currently available for loan
    pub stock: i32,
}

impl Book {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
