//! Comment and comment-of-comment handlers

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::success;
use super::path_id;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub posting_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentOfCommentRequest {
    pub comment_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    #[serde(rename = "posting-id")]
    pub posting_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentOfCommentQuery {
    #[serde(rename = "comment-id")]
    pub comment_id: Option<String>,
}

/// Query ids that are absent or not numbers can never match a row.
fn parse_id(raw: Option<String>) -> Result<i64> {
    raw.and_then(|id| id.parse::<i64>().ok())
        .ok_or(Error::NotFound)
}

/// POST /posting/comment
pub async fn create_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::MissingField)?;
    let posting_id = req.posting_id.ok_or(Error::MissingField)?;

    info!("POST /posting/comment - posting {} user {}", posting_id, ctx.user_id());

    if !state.postings.posting_exists(posting_id).await? {
        return Err(Error::NotFound);
    }
    let content = req.content.ok_or(Error::MissingField)?;

    state
        .postings
        .create_comment(posting_id, ctx.user_id(), &content)
        .await?;

    Ok(success())
}

/// GET /posting/comment?posting-id=N
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<Value>> {
    info!("GET /posting/comment - {:?}", query.posting_id);

    let posting_id = parse_id(query.posting_id)?;
    let comments = state.postings.list_comments(posting_id).await?;

    Ok(Json(json!({ "comment_data": comments })))
}

/// DELETE /posting/comment/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    comment_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let comment_id = path_id(comment_id)?;
    info!("DELETE /posting/comment/{} - user {}", comment_id, ctx.user_id());

    state.postings.delete_comment(comment_id).await?;

    Ok(success())
}

/// POST /posting/commentofcomment
pub async fn create_comment_of_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<CommentOfCommentRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::MissingField)?;
    let comment_id = req.comment_id.ok_or(Error::MissingField)?;

    info!(
        "POST /posting/commentofcomment - comment {} user {}",
        comment_id,
        ctx.user_id()
    );

    if !state.postings.comment_exists(comment_id).await? {
        return Err(Error::NotFound);
    }
    let content = req.content.ok_or(Error::MissingField)?;

    state
        .postings
        .create_comment_of_comment(comment_id, ctx.user_id(), &content)
        .await?;

    Ok(success())
}

/// GET /posting/commentofcomment?comment-id=N
pub async fn list_comment_of_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentOfCommentQuery>,
) -> Result<Json<Value>> {
    info!("GET /posting/commentofcomment - {:?}", query.comment_id);

    let comment_id = parse_id(query.comment_id)?;
    let replies = state.postings.list_comment_of_comments(comment_id).await?;

    Ok(Json(json!({ "comment_of_comment_list": replies })))
}
