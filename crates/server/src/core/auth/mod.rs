//! Authentication Module
//!
//! Handles user signup, signin and identity resolution.
//! Users live in the `users` table; signin hands out a signed token
//! from [`token::TokenCodec`] instead of a stored session.

pub mod handlers;
pub mod middleware;
pub mod token;

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use token::{TokenCodec, TokenError};

pub const MINIMUM_PASSWORD_LENGTH: usize = 8;

/// User record stored in database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    AlreadyExists,
    #[error("email has the wrong form")]
    InvalidFormat,
    #[error("password shorter than 8 characters")]
    TooShort,
    #[error("no user with that email")]
    InvalidUser,
    #[error("wrong password")]
    WrongPassword,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// `x@y.z`: an `@` followed somewhere later by a `.`.
pub fn is_valid_email(email: &str) -> bool {
    match email.find('@') {
        Some(at) => email[at + 1..].contains('.'),
        None => false,
    }
}

/// Auth manager handles all credential operations
pub struct AuthManager {
    pool: SqlitePool,
    tokens: Arc<TokenCodec>,
    hash_cost: u32,
}

impl AuthManager {
    pub fn new(pool: SqlitePool, tokens: Arc<TokenCodec>, hash_cost: u32) -> Self {
        Self {
            pool,
            tokens,
            hash_cost,
        }
    }

    /// Register a new user.
    ///
    /// Checks run in order: uniqueness, email form, password length.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        if !is_valid_email(email) {
            return Err(AuthError::InvalidFormat);
        }

        if password.chars().count() < MINIMUM_PASSWORD_LENGTH {
            return Err(AuthError::TooShort);
        }

        let password_hash = hash(password, self.hash_cost)?;
        self.insert_user(email, &password_hash).await?;

        info!("[Auth] User registered: {}", email);

        Ok(())
    }

    /// A concurrent signup that slipped past the lookup still hits the
    /// unique index on `email`.
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<i64, AuthError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::AlreadyExists,
            other => AuthError::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Check credentials and issue a token for the user.
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidUser)?;

        if !verify(password, &user.password_hash)? {
            warn!("[Auth] Failed signin attempt for {}", email);
            return Err(AuthError::WrongPassword);
        }

        let token = self.tokens.issue(user.id)?;

        info!("[Auth] User signed in: {}", user.email);

        Ok(token)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db;
    use jsonwebtoken::Algorithm;
    use tempfile::TempDir;

    async fn manager(temp_dir: &TempDir) -> AuthManager {
        let pool = db::connect(&temp_dir.path().join("auth.sqlite")).await.unwrap();
        db::init_schema(&pool).await.unwrap();
        let tokens = Arc::new(TokenCodec::new(b"auth-test-secret", Algorithm::HS256));
        AuthManager::new(pool, tokens, 4)
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("test1@naver.com"));
        assert!(!is_valid_email("test2naver.com"));
        assert!(!is_valid_email("test2@navercom"));
        assert!(!is_valid_email("test.2@navercom"));
    }

    #[tokio::test]
    async fn test_signup_then_signin() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;

        auth.signup("test1@naver.com", "1234567890").await.unwrap();
        let token = auth.signin("test1@naver.com", "1234567890").await.unwrap();

        let user_id = auth.tokens.verify(&token).unwrap();
        let user = auth.get_user(user_id).await.unwrap();
        assert_eq!(user.email, "test1@naver.com");
        assert_ne!(user.password_hash, "1234567890");
    }

    #[tokio::test]
    async fn test_duplicate_checked_before_password_length() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;

        auth.signup("test1@naver.com", "1234567890").await.unwrap();
        let err = auth.signup("test1@naver.com", "123").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));

        let err = auth.signup("test2naver.com", "123").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat));

        let err = auth.signup("test3@naver.com", "1234567").await.unwrap_err();
        assert!(matches!(err, AuthError::TooShort));
    }

    #[tokio::test]
    async fn test_signin_failures() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;
        auth.signup("test1@naver.com", "1234567890").await.unwrap();

        let err = auth.signin("nobody@naver.com", "1234567890").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidUser));

        let err = auth.signin("test1@naver.com", "0987654321").await.unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
    }

    #[tokio::test]
    async fn test_racing_insert_is_already_exists() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;

        auth.insert_user("test1@naver.com", "hash").await.unwrap();
        let err = auth.insert_user("test1@naver.com", "hash").await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_concurrent_signups_one_wins() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;

        let (first, second) = tokio::join!(
            auth.signup("test1@naver.com", "1234567890"),
            auth.signup("test1@naver.com", "1234567890"),
        );
        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AuthError::AlreadyExists))));
    }

    #[tokio::test]
    async fn test_unknown_user_id() {
        let temp_dir = TempDir::new().unwrap();
        let auth = manager(&temp_dir).await;
        assert!(matches!(
            auth.get_user(999).await.unwrap_err(),
            AuthError::UserNotFound
        ));
    }
}
