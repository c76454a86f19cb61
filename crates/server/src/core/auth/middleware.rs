use crate::core::config::AppState;
use crate::core::ctx::Ctx;
use crate::core::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Resolve the caller from the `Authorization` header before the wrapped
/// handler runs.
///
/// No header is `Unauthenticated`; a token that does not decode is
/// `MalformedToken`; a stale one is `TokenExpired`; a token for a user that
/// is gone is `UnknownUser`. The handler is only reached with a `Ctx`.
pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let token = match req.headers().get(header::AUTHORIZATION) {
        Some(h) => h
            .to_str()
            .map_err(|_| Error::MalformedToken)?
            .to_string(),
        None => return Err(Error::Unauthenticated),
    };

    // Raw token; a "Bearer " prefix is tolerated
    let token = token.strip_prefix("Bearer ").unwrap_or(&token);

    let user_id = state.tokens.verify(token)?;
    let user = state.auth.get_user(user_id).await?;

    req.extensions_mut().insert(Ctx::new(user.id));

    Ok(next.run(req).await)
}
