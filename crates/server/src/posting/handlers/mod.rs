//! Posting Handlers

pub mod comment;
pub mod like;
pub mod posting;

use crate::core::error::{Error, Result};
use axum::extract::{rejection::PathRejection, Path};

pub use comment::{
    create_comment, create_comment_of_comment, delete_comment, list_comment_of_comments,
    list_comments,
};
pub use like::{list_likes, toggle_like};
pub use posting::{create_posting, delete_posting, get_posting, list_postings, update_posting};

/// Path ids that are not numbers can never match a row.
pub(crate) fn path_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    path.map(|Path(id)| id).map_err(|_| Error::NotFound)
}
