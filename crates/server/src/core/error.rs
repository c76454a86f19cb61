use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::core::auth::token::TokenError;
use crate::core::auth::AuthError;
use crate::core::store::StoreError;

#[derive(Debug)]
pub enum Error {
    // Auth Errors
    Unauthenticated,
    MalformedToken,
    TokenExpired,
    UnknownUser,
    CtxNotInRequestExt,

    // Credential Errors
    InvalidUser,
    WrongPassword,
    AlreadyExists,
    WrongForm,
    TooShort,

    // Payload Errors
    /// Missing field on the `/user` signup and signin endpoints.
    KeyError,
    /// Missing field everywhere else.
    MissingField,

    // Model Errors
    NotFound,

    // Generic
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthenticated | Error::InvalidUser | Error::WrongPassword => {
                StatusCode::UNAUTHORIZED
            }
            Error::MalformedToken
            | Error::TokenExpired
            | Error::UnknownUser
            | Error::AlreadyExists
            | Error::WrongForm
            | Error::TooShort
            | Error::KeyError
            | Error::MissingField => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::CtxNotInRequestExt | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Error::Unauthenticated | Error::UnknownUser => "INVALID USER",
            Error::MalformedToken => "INVALID TOKEN",
            Error::TokenExpired => "TOKEN EXPIRED",
            Error::InvalidUser => "INVALID_USER",
            Error::WrongPassword => "WRONG_PASSWORD",
            Error::AlreadyExists => "ALREADY EXIST",
            Error::WrongForm => "WRONG FORM",
            Error::TooShort => "TOO SHORT",
            Error::KeyError => "KEY_ERROR",
            Error::MissingField => "KEY ERROR",
            Error::NotFound => "NOT FOUND",
            Error::CtxNotInRequestExt | Error::Internal(_) => "INTERNAL ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Internal(detail) = &self {
            error!("Internal error: {}", detail);
        }

        let body = Json(json!({ "message": self.message() }));

        (self.status(), body).into_response()
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => Error::MalformedToken,
            TokenError::Expired => Error::TokenExpired,
            TokenError::Signing(e) => Error::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists => Error::AlreadyExists,
            AuthError::InvalidFormat => Error::WrongForm,
            AuthError::TooShort => Error::TooShort,
            AuthError::InvalidUser => Error::InvalidUser,
            AuthError::WrongPassword => Error::WrongPassword,
            AuthError::UserNotFound => Error::UnknownUser,
            AuthError::Token(e) => e.into(),
            AuthError::Hash(e) => Error::Internal(e.to_string()),
            AuthError::Database(e) => Error::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Error::NotFound,
            StoreError::Database(e) => Error::Internal(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err: Error = StoreError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "NOT FOUND");
    }

    #[test]
    fn test_missing_header_and_unknown_user_share_message() {
        assert_eq!(Error::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::UnknownUser.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Unauthenticated.message(), Error::UnknownUser.message());
    }

    #[test]
    fn test_expired_token_maps_through_auth_error() {
        let err: Error = AuthError::Token(TokenError::Expired).into();
        assert_eq!(err.message(), "TOKEN EXPIRED");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
