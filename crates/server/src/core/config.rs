//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use jsonwebtoken::Algorithm;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::core::auth::token::TokenCodec;
use crate::core::auth::AuthManager;
use crate::core::db;
use crate::posting::PostingManager;
use crate::social::FollowManager;

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECS: i64 = 3600;

const SECRET_KEY_LEN: usize = 32;

/// Configuration for the social server
#[derive(Clone)]
pub struct ServerConfig {
    /// Directory holding the database and the generated secret key
    pub data_dir: PathBuf,
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// Token signing secret; generated into `data_dir` when absent
    pub secret_key: Option<Vec<u8>>,
    /// Token signing algorithm (HMAC family only)
    pub jwt_algorithm: Algorithm,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("social_data"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            secret_key: None,
            jwt_algorithm: Algorithm::HS256,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// Create config with custom data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Build config from `SOCIAL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("SOCIAL_DATA_DIR") {
            Ok(dir) => Self::with_data_dir(dir),
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("SOCIAL_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("Invalid SOCIAL_BIND_ADDR: {}", addr))?;
        }

        if let Ok(secret) = std::env::var("SOCIAL_SECRET_KEY") {
            config.secret_key = Some(secret.into_bytes());
        }

        if let Ok(alg) = std::env::var("SOCIAL_JWT_ALGORITHM") {
            config.jwt_algorithm = parse_algorithm(&alg)?;
        }

        if let Ok(cost) = std::env::var("SOCIAL_BCRYPT_COST") {
            config.bcrypt_cost = cost
                .parse()
                .with_context(|| format!("Invalid SOCIAL_BCRYPT_COST: {}", cost))?;
        }

        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("social.sqlite")
    }

    /// Ensure the data directory exists
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }

    /// Configured secret, or the 256-bit key stored in `data_dir/secret_key`
    /// (generated on first start).
    pub async fn load_secret_key(&self) -> Result<Vec<u8>> {
        if let Some(secret) = &self.secret_key {
            return Ok(secret.clone());
        }

        let key_path = self.data_dir.join("secret_key");

        if let Ok(key) = tokio::fs::read(&key_path).await {
            if key.len() == SECRET_KEY_LEN {
                info!("Signing key loaded from {}", key_path.display());
                return Ok(key);
            }
            warn!("Signing key file has wrong size ({}), regenerating", key.len());
        }

        let key: [u8; SECRET_KEY_LEN] = rand::rng().random();
        tokio::fs::write(&key_path, key)
            .await
            .with_context(|| format!("Failed to write {}", key_path.display()))?;
        info!("Signing key generated at {}", key_path.display());

        Ok(key.to_vec())
    }
}

/// Parse an HMAC algorithm name (`HS256`, `HS384`, `HS512`).
pub fn parse_algorithm(name: &str) -> Result<Algorithm> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|e| anyhow::anyhow!("Unknown signing algorithm {}: {}", name, e))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => anyhow::bail!("Signing algorithm {:?} needs a key pair, only HMAC is supported", other),
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: Arc<TokenCodec>,
    pub auth: Arc<AuthManager>,
    pub follows: Arc<FollowManager>,
    pub postings: Arc<PostingManager>,
}

impl AppState {
    /// Open the database, load the signing key and wire up the stores.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        config.ensure_dirs().await?;

        let pool = db::connect(&config.database_path()).await?;
        db::init_schema(&pool).await?;

        let secret = config.load_secret_key().await?;
        let tokens = Arc::new(TokenCodec::new(&secret, config.jwt_algorithm));

        let auth = Arc::new(AuthManager::new(
            pool.clone(),
            tokens.clone(),
            config.bcrypt_cost,
        ));
        let follows = Arc::new(FollowManager::new(pool.clone()));
        let postings = Arc::new(PostingManager::new(pool.clone()));

        Ok(Self {
            pool,
            tokens,
            auth,
            follows,
            postings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_algorithm() {
        assert_eq!(parse_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_algorithm("RS256").is_err());
        assert!(parse_algorithm("nope").is_err());
    }

    #[tokio::test]
    async fn test_generated_key_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig::with_data_dir(temp_dir.path());

        let first = config.load_secret_key().await.unwrap();
        let second = config.load_secret_key().await.unwrap();
        assert_eq!(first.len(), SECRET_KEY_LEN);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_configured_secret_wins() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_data_dir(temp_dir.path());
        config.secret_key = Some(b"configured".to_vec());

        assert_eq!(config.load_secret_key().await.unwrap(), b"configured".to_vec());
        assert!(!temp_dir.path().join("secret_key").exists());
    }
}
