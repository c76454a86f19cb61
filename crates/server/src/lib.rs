//! Social Posting Server Library
//!
//! Users sign up and sign in for a signed token, follow each other, and
//! publish postings with images, comments, replies to comments and likes.

pub mod core;
pub mod posting;
pub mod social;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::{router, AppState, ServerConfig};

/// Install the global fmt subscriber (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if fmt().with_env_filter(filter).try_init().is_err() {
        // Already set, ignore
    }
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== Social Server ===");

    let config = ServerConfig::from_env()?;
    info!("Data directory: {:?}", config.data_dir);
    info!("Database: {:?}", config.database_path());
    info!("Signing algorithm: {:?}", config.jwt_algorithm);

    let app_state = AppState::new(&config).await?;
    info!("Stores initialized");

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
