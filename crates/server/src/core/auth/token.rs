//! Signed, expiring identity tokens (JWT).

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::TOKEN_TTL_SECS;

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with one process-wide key and algorithm.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            exp: Utc::now().timestamp() + self.ttl_secs,
        };

        encode(&self.header, &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Decode a token and return the embedded user id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        self.decode_claims(token).map(|claims| claims.user_id)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"unit-test-secret", Algorithm::HS256)
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let token = codec.issue(42).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_expiry_is_one_hour_out() {
        let codec = codec();
        let before = Utc::now().timestamp();
        let claims = codec.decode_claims(&codec.issue(7).unwrap()).unwrap();
        let after = Utc::now().timestamp();

        assert!(claims.exp >= before + TOKEN_TTL_SECS);
        assert!(claims.exp <= after + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token() {
        let codec = codec().with_ttl(-30);
        let token = codec.issue(1).unwrap();
        assert!(matches!(codec.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(codec().verify("not-a-token"), Err(TokenError::Malformed)));
        assert!(matches!(codec().verify(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_foreign_secret_is_malformed() {
        let other = TokenCodec::new(b"some-other-secret", Algorithm::HS256);
        let token = other.issue(1).unwrap();
        assert!(matches!(codec().verify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn test_algorithm_mismatch_is_malformed() {
        let other = TokenCodec::new(b"unit-test-secret", Algorithm::HS512);
        let token = other.issue(1).unwrap();
        assert!(matches!(codec().verify(&token), Err(TokenError::Malformed)));
    }
}
