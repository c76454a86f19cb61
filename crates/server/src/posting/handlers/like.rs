//! Like handlers

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::Result;
use crate::core::success;
use super::path_id;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

/// POST /posting/like/{posting_id}
///
/// The body is ignored.
pub async fn toggle_like(
    State(state): State<AppState>,
    ctx: Ctx,
    posting_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let posting_id = path_id(posting_id)?;
    info!("POST /posting/like/{} - user {}", posting_id, ctx.user_id());

    state.postings.toggle_like(ctx.user_id(), posting_id).await?;

    Ok(success())
}

/// GET /posting/like/{posting_id}
pub async fn list_likes(
    State(state): State<AppState>,
    posting_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>> {
    let posting_id = path_id(posting_id)?;
    info!("GET /posting/like/{}", posting_id);

    let likes = state.postings.list_likes(posting_id).await?;

    Ok(Json(json!({ "like_list": likes })))
}
