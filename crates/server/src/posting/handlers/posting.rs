//! Posting handlers

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::success;
use super::path_id;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Body of `POST /posting` and `PATCH /posting/{id}`
#[derive(Debug, Deserialize)]
pub struct PostingRequest {
    pub content: Option<String>,
    pub image: Option<Vec<String>>,
}

/// POST /posting
pub async fn create_posting(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<PostingRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::MissingField)?;
    let images = req.image.ok_or(Error::MissingField)?;

    info!("POST /posting - user {}", ctx.user_id());

    state
        .postings
        .create_posting(ctx.user_id(), req.content.as_deref(), &images)
        .await?;

    Ok(success())
}

/// GET /posting/{posting_id}
pub async fn get_posting(
    State(state): State<AppState>,
    posting_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let posting_id = path_id(posting_id)?;
    info!("GET /posting/{}", posting_id);

    let posting = state.postings.get_posting(posting_id).await?;

    Ok(Json(json!({ "posting_data": [posting] })))
}

/// GET /posting/list/{user_id}
pub async fn list_postings(
    State(state): State<AppState>,
    user_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let user_id = path_id(user_id)?;
    info!("GET /posting/list/{}", user_id);

    let postings = state.postings.list_postings(user_id).await?;

    Ok(Json(json!({ "posting_list": postings })))
}

/// PATCH /posting/{posting_id}
pub async fn update_posting(
    State(state): State<AppState>,
    ctx: Ctx,
    posting_id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<PostingRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let posting_id = path_id(posting_id)?;
    info!("PATCH /posting/{} - user {}", posting_id, ctx.user_id());

    if !state.postings.posting_exists(posting_id).await? {
        return Err(Error::NotFound);
    }

    let Json(req) = payload.map_err(|_| Error::MissingField)?;
    let (Some(content), Some(images)) = (req.content, req.image) else {
        return Err(Error::MissingField);
    };

    state
        .postings
        .update_posting(posting_id, &content, &images)
        .await?;

    Ok(success())
}

/// DELETE /posting/{posting_id}
pub async fn delete_posting(
    State(state): State<AppState>,
    ctx: Ctx,
    posting_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let posting_id = path_id(posting_id)?;
    info!("DELETE /posting/{} - user {}", posting_id, ctx.user_id());

    state.postings.delete_posting(posting_id).await?;

    Ok(success())
}
