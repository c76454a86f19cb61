//! Follow Handlers

use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use crate::core::success;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum FollowButton {
    #[serde(rename = "+")]
    Follow,
    #[serde(rename = "-")]
    Unfollow,
}

/// Request to follow or unfollow a user
#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub to_user_id: Option<i64>,
    pub follow_button: Option<FollowButton>,
}

#[derive(Debug, Deserialize)]
pub struct RelationsQuery {
    #[serde(rename = "user-id")]
    pub user_id: Option<String>,
}

/// POST /user/follow
pub async fn follow(
    State(state): State<AppState>,
    ctx: Ctx,
    payload: std::result::Result<Json<FollowRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::MissingField)?;
    let (Some(to_user_id), Some(button)) = (req.to_user_id, req.follow_button) else {
        return Err(Error::MissingField);
    };

    info!("POST /user/follow - {} {:?} {}", ctx.user_id(), button, to_user_id);

    match button {
        FollowButton::Follow => {
            state.follows.follow(ctx.user_id(), to_user_id).await?;
        }
        FollowButton::Unfollow => {
            state.follows.unfollow(ctx.user_id(), to_user_id).await?;
        }
    }

    Ok(success())
}

/// GET /user/follow?user-id=N
pub async fn list_relations(
    State(state): State<AppState>,
    Query(query): Query<RelationsQuery>,
) -> Result<Json<Value>> {
    info!("GET /user/follow - {:?}", query.user_id);

    let user_id = query
        .user_id
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or(Error::NotFound)?;

    let relations = state.follows.relations(user_id).await?;

    Ok(Json(json!({ "follow_list": [relations] })))
}
