//! Shared store plumbing
//!
//! Error type and existence probes used by the follow graph and the
//! posting store before they insert rows that point at a parent.

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("referenced entity not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Tables that can be probed by id.
#[derive(Debug, Clone, Copy)]
pub enum Table {
    Users,
    Postings,
    Comments,
}

impl Table {
    fn exists_query(self) -> &'static str {
        match self {
            Table::Users => "SELECT id FROM users WHERE id = ?",
            Table::Postings => "SELECT id FROM postings WHERE id = ?",
            Table::Comments => "SELECT id FROM comments WHERE id = ?",
        }
    }
}

pub async fn exists(pool: &SqlitePool, table: Table, id: i64) -> StoreResult<bool> {
    let row: Option<i64> = sqlx::query_scalar(table.exists_query())
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Fails with `StoreError::NotFound` unless the row exists.
pub async fn ensure_exists(pool: &SqlitePool, table: Table, id: i64) -> StoreResult<()> {
    if exists(pool, table, id).await? {
        Ok(())
    } else {
        Err(StoreError::NotFound)
    }
}
