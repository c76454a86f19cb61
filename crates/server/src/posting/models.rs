use chrono::{DateTime, Utc};
use serde::Serialize;

/// Postings are reported to the second.
pub const POSTING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Comments are reported to the minute.
pub const COMMENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Posting row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Posting {
    pub id: i64,
    pub user_id: i64,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Posting as returned by the API, images in insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingView {
    pub id: i64,
    pub content: Option<String>,
    pub image: Vec<String>,
    pub created_at: String,
}

impl PostingView {
    pub fn new(posting: Posting, image: Vec<String>) -> Self {
        Self {
            id: posting.id,
            content: posting.content,
            image,
            created_at: posting.created_at.format(POSTING_TIME_FORMAT).to_string(),
        }
    }
}

/// Comment row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub posting_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub posting_id: i64,
    pub created_at: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            user_id: comment.user_id,
            posting_id: comment.posting_id,
            created_at: comment.created_at.format(COMMENT_TIME_FORMAT).to_string(),
        }
    }
}

/// Second-level reply; no further nesting
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CommentOfComment {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub comment_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Like {
    pub id: i64,
    pub posting_id: i64,
    pub user_id: i64,
}
