//! Auth handlers

use crate::core::config::AppState;
use crate::core::error::{Error, Result};
use crate::core::success;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /user/signup
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::KeyError)?;
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(Error::KeyError);
    };

    info!("POST /user/signup - {}", email);

    if let Err(e) = state.auth.signup(&email, &password).await {
        warn!("Signup failed for {}: {}", email, e);
        return Err(e.into());
    }

    Ok(success())
}

/// POST /user/signin
pub async fn signin(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload.map_err(|_| Error::KeyError)?;
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(Error::KeyError);
    };

    info!("POST /user/signin - {}", email);

    let token = state.auth.signin(&email, &password).await?;

    Ok(Json(json!({ "Authorization": token })))
}
