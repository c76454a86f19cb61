//! Core Router
//!
//! Every route of the server. Protected methods get `mw_require_auth` as a
//! route layer; methods chained after the layer stay public.

use crate::core::auth::handlers as auth_handlers;
use crate::core::auth::middleware::mw_require_auth;
use crate::core::AppState;
use crate::posting::handlers as posting_handlers;
use crate::social::handlers as social_handlers;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let require_auth = middleware::from_fn_with_state(state.clone(), mw_require_auth);

    Router::new()
        // User routes
        .route("/user/signup", post(auth_handlers::signup))
        .route("/user/signin", post(auth_handlers::signin))
        .route(
            "/user/follow",
            post(social_handlers::follow)
                .route_layer(require_auth.clone())
                .get(social_handlers::list_relations),
        )
        // Posting routes
        .route(
            "/posting",
            post(posting_handlers::create_posting).route_layer(require_auth.clone()),
        )
        .route(
            "/posting/{posting_id}",
            patch(posting_handlers::update_posting)
                .delete(posting_handlers::delete_posting)
                .route_layer(require_auth.clone())
                .get(posting_handlers::get_posting),
        )
        .route(
            "/posting/list/{user_id}",
            get(posting_handlers::list_postings),
        )
        // Comment routes
        .route(
            "/posting/comment",
            post(posting_handlers::create_comment)
                .route_layer(require_auth.clone())
                .get(posting_handlers::list_comments),
        )
        .route(
            "/posting/comment/{comment_id}",
            delete(posting_handlers::delete_comment).route_layer(require_auth.clone()),
        )
        .route(
            "/posting/commentofcomment",
            post(posting_handlers::create_comment_of_comment)
                .route_layer(require_auth.clone())
                .get(posting_handlers::list_comment_of_comments),
        )
        // Like routes
        .route(
            "/posting/like/{posting_id}",
            post(posting_handlers::toggle_like)
                .route_layer(require_auth)
                .get(posting_handlers::list_likes),
        )
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
