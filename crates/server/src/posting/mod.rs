//! Posting Store
//!
//! Postings with their images, comments, comments of comments and likes.
//! Every child insert is preceded by an existence probe on its parent, and
//! deletes cascade explicitly, children first.

pub mod handlers;
pub mod models;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::core::store::{ensure_exists, exists, StoreError, StoreResult, Table};
use models::{Comment, CommentOfComment, CommentView, Like, Posting, PostingView};

pub struct PostingManager {
    pool: SqlitePool,
}

impl PostingManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn posting_exists(&self, posting_id: i64) -> StoreResult<bool> {
        exists(&self.pool, Table::Postings, posting_id).await
    }

    pub async fn comment_exists(&self, comment_id: i64) -> StoreResult<bool> {
        exists(&self.pool, Table::Comments, comment_id).await
    }

    // ========== Postings ==========

    /// Create a posting owned by `user_id` with one image row per entry.
    pub async fn create_posting(
        &self,
        user_id: i64,
        content: Option<&str>,
        images: &[String],
    ) -> StoreResult<i64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let posting_id = sqlx::query(
            "INSERT INTO postings (user_id, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for image in images {
            sqlx::query("INSERT INTO images (posting_id, image) VALUES (?, ?)")
                .bind(posting_id)
                .bind(image)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            "[Posting] Created {} by user {} ({} images)",
            posting_id,
            user_id,
            images.len()
        );
        Ok(posting_id)
    }

    pub async fn get_posting(&self, posting_id: i64) -> StoreResult<PostingView> {
        let posting = sqlx::query_as::<_, Posting>(
            "SELECT id, user_id, content, created_at, updated_at FROM postings WHERE id = ?",
        )
        .bind(posting_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let images = self.images_of(posting.id).await?;
        Ok(PostingView::new(posting, images))
    }

    /// Postings of a user; an unknown user simply has none.
    pub async fn list_postings(&self, user_id: i64) -> StoreResult<Vec<PostingView>> {
        let postings = sqlx::query_as::<_, Posting>(
            "SELECT id, user_id, content, created_at, updated_at FROM postings WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut views = Vec::with_capacity(postings.len());
        for posting in postings {
            let images = self.images_of(posting.id).await?;
            views.push(PostingView::new(posting, images));
        }
        Ok(views)
    }

    /// Replace the content and the whole image set.
    pub async fn update_posting(
        &self,
        posting_id: i64,
        content: &str,
        images: &[String],
    ) -> StoreResult<()> {
        ensure_exists(&self.pool, Table::Postings, posting_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE postings SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(posting_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM images WHERE posting_id = ?")
            .bind(posting_id)
            .execute(&mut *tx)
            .await?;

        for image in images {
            sqlx::query("INSERT INTO images (posting_id, image) VALUES (?, ?)")
                .bind(posting_id)
                .bind(image)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("[Posting] Updated {} ({} images)", posting_id, images.len());
        Ok(())
    }

    /// Delete a posting with its images, comments (and their replies) and likes.
    pub async fn delete_posting(&self, posting_id: i64) -> StoreResult<()> {
        ensure_exists(&self.pool, Table::Postings, posting_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM comment_of_comment WHERE comment_id IN (SELECT id FROM comments WHERE posting_id = ?)",
        )
        .bind(posting_id)
        .execute(&mut *tx)
        .await?;

        for statement in [
            "DELETE FROM comments WHERE posting_id = ?",
            "DELETE FROM images WHERE posting_id = ?",
            "DELETE FROM likes WHERE posting_id = ?",
            "DELETE FROM postings WHERE id = ?",
        ] {
            sqlx::query(statement)
                .bind(posting_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("[Posting] Deleted {}", posting_id);
        Ok(())
    }

    async fn images_of(&self, posting_id: i64) -> StoreResult<Vec<String>> {
        let images: Vec<String> =
            sqlx::query_scalar("SELECT image FROM images WHERE posting_id = ? ORDER BY id")
                .bind(posting_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(images)
    }

    // ========== Comments ==========

    pub async fn create_comment(
        &self,
        posting_id: i64,
        user_id: i64,
        content: &str,
    ) -> StoreResult<i64> {
        ensure_exists(&self.pool, Table::Postings, posting_id).await?;

        let now = Utc::now();
        let id = sqlx::query(
            "INSERT INTO comments (posting_id, user_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(posting_id)
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("[Comment] Created {} on posting {}", id, posting_id);
        Ok(id)
    }

    pub async fn list_comments(&self, posting_id: i64) -> StoreResult<Vec<CommentView>> {
        ensure_exists(&self.pool, Table::Postings, posting_id).await?;

        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, posting_id, user_id, content, created_at, updated_at FROM comments WHERE posting_id = ? ORDER BY id",
        )
        .bind(posting_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments.into_iter().map(CommentView::from).collect())
    }

    /// Delete a comment and its replies.
    pub async fn delete_comment(&self, comment_id: i64) -> StoreResult<()> {
        ensure_exists(&self.pool, Table::Comments, comment_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comment_of_comment WHERE comment_id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("[Comment] Deleted {}", comment_id);
        Ok(())
    }

    pub async fn create_comment_of_comment(
        &self,
        comment_id: i64,
        user_id: i64,
        content: &str,
    ) -> StoreResult<i64> {
        ensure_exists(&self.pool, Table::Comments, comment_id).await?;

        let id = sqlx::query(
            "INSERT INTO comment_of_comment (comment_id, user_id, content) VALUES (?, ?, ?)",
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(content)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("[Comment] Reply {} on comment {}", id, comment_id);
        Ok(id)
    }

    pub async fn list_comment_of_comments(
        &self,
        comment_id: i64,
    ) -> StoreResult<Vec<CommentOfComment>> {
        ensure_exists(&self.pool, Table::Comments, comment_id).await?;

        let replies = sqlx::query_as::<_, CommentOfComment>(
            "SELECT id, user_id, content, comment_id FROM comment_of_comment WHERE comment_id = ? ORDER BY id",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(replies)
    }

    // ========== Likes ==========

    /// Drop any likes of `user_id` on the posting, then record a fresh one.
    ///
    /// A like always exists afterwards; repeating the call swaps it for a
    /// new row id rather than removing it.
    pub async fn toggle_like(&self, user_id: i64, posting_id: i64) -> StoreResult<i64> {
        ensure_exists(&self.pool, Table::Postings, posting_id).await?;

        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM likes WHERE user_id = ? AND posting_id = ?")
            .bind(user_id)
            .bind(posting_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let id = sqlx::query("INSERT INTO likes (user_id, posting_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(posting_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        tx.commit().await?;

        info!(
            "[Like] User {} on posting {} (replaced {})",
            user_id, posting_id, removed
        );
        Ok(id)
    }

    /// Likes of a posting. No likes at all reads as `NotFound`.
    pub async fn list_likes(&self, posting_id: i64) -> StoreResult<Vec<Like>> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT id, posting_id, user_id FROM likes WHERE posting_id = ? ORDER BY id",
        )
        .bind(posting_id)
        .fetch_all(&self.pool)
        .await?;

        if likes.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(likes)
    }
}
