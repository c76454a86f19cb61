//! Follow Graph Module
//!
//! Directed follow edges between users, stored in the `follows` table of
//! the main database. Edges are not deduplicated: following twice stores
//! two rows, and unfollowing removes every row for the pair.

pub mod handlers;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::store::{ensure_exists, StoreResult, Table};

/// Who a user follows and who follows them, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Relations {
    pub following: Vec<i64>,
    pub follower: Vec<i64>,
}

/// Follow manager handles all follow-graph operations
pub struct FollowManager {
    pool: SqlitePool,
}

impl FollowManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an edge `from_user_id -> to_user_id`.
    pub async fn follow(&self, from_user_id: i64, to_user_id: i64) -> StoreResult<i64> {
        ensure_exists(&self.pool, Table::Users, to_user_id).await?;

        let id = sqlx::query("INSERT INTO follows (from_user_id, to_user_id) VALUES (?, ?)")
            .bind(from_user_id)
            .bind(to_user_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!("[Follow] {} -> {}", from_user_id, to_user_id);
        Ok(id)
    }

    /// Remove every edge `from_user_id -> to_user_id`; no edges is fine.
    pub async fn unfollow(&self, from_user_id: i64, to_user_id: i64) -> StoreResult<u64> {
        ensure_exists(&self.pool, Table::Users, to_user_id).await?;

        let removed = sqlx::query("DELETE FROM follows WHERE from_user_id = ? AND to_user_id = ?")
            .bind(from_user_id)
            .bind(to_user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!("[Follow] {} -/-> {} ({} edges)", from_user_id, to_user_id, removed);
        Ok(removed)
    }

    /// Following and follower ids for an existing user.
    pub async fn relations(&self, user_id: i64) -> StoreResult<Relations> {
        ensure_exists(&self.pool, Table::Users, user_id).await?;

        let following: Vec<i64> =
            sqlx::query_scalar("SELECT to_user_id FROM follows WHERE from_user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let follower: Vec<i64> =
            sqlx::query_scalar("SELECT from_user_id FROM follows WHERE to_user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Relations {
            following,
            follower,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db;
    use crate::core::store::StoreError;
    use tempfile::TempDir;

    async fn setup(temp_dir: &TempDir, users: usize) -> FollowManager {
        let pool = db::connect(&temp_dir.path().join("follows.sqlite")).await.unwrap();
        db::init_schema(&pool).await.unwrap();
        for n in 0..users {
            sqlx::query(
                "INSERT INTO users (email, password_hash, created_at, updated_at) VALUES (?, 'x', ?, ?)",
            )
            .bind(format!("user{}@test.com", n))
            .bind(chrono::Utc::now())
            .bind(chrono::Utc::now())
            .execute(&pool)
            .await
            .unwrap();
        }
        FollowManager::new(pool)
    }

    #[tokio::test]
    async fn test_duplicate_follow_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let follows = setup(&temp_dir, 3).await;

        follows.follow(1, 2).await.unwrap();
        follows.follow(1, 2).await.unwrap();
        follows.follow(3, 1).await.unwrap();

        let relations = follows.relations(1).await.unwrap();
        assert_eq!(relations.following, vec![2, 2]);
        assert_eq!(relations.follower, vec![3]);

        let relations = follows.relations(2).await.unwrap();
        assert_eq!(relations.following, Vec::<i64>::new());
        assert_eq!(relations.follower, vec![1, 1]);
    }

    #[tokio::test]
    async fn test_unfollow_removes_all_edges() {
        let temp_dir = TempDir::new().unwrap();
        let follows = setup(&temp_dir, 2).await;

        follows.follow(1, 2).await.unwrap();
        follows.follow(1, 2).await.unwrap();
        assert_eq!(follows.unfollow(1, 2).await.unwrap(), 2);
        assert_eq!(follows.unfollow(1, 2).await.unwrap(), 0);
        assert_eq!(follows.relations(1).await.unwrap(), Relations::default());
    }

    #[tokio::test]
    async fn test_unknown_users() {
        let temp_dir = TempDir::new().unwrap();
        let follows = setup(&temp_dir, 1).await;

        assert!(matches!(follows.follow(1, 42).await, Err(StoreError::NotFound)));
        assert!(matches!(follows.relations(42).await, Err(StoreError::NotFound)));
        // Existing user without edges is not an error
        assert_eq!(follows.relations(1).await.unwrap(), Relations::default());
    }
}
