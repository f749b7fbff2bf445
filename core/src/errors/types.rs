//! Authentication and token error types
//!
//! `AuthFailure` is the tagged outcome returned to callers of the credential
//! authority. `TokenError` keeps the precise reason a token was rejected;
//! the public verification path collapses it into `AuthFailure::InvalidToken`.

use thiserror::Error;

/// Expected, recoverable authentication outcomes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("User not found")]
    NotFound,

    #[error("Invalid credentials")]
    BadCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Username already taken")]
    UsernameTaken,
}

impl AuthFailure {
    /// True for the two outcomes of a failed login.
    ///
    /// End users must get one indistinguishable response for both, otherwise
    /// the response leaks whether a username exists.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthFailure::NotFound | AuthFailure::BadCredentials)
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::NotFound => "USER_NOT_FOUND",
            AuthFailure::BadCredentials => "BAD_CREDENTIALS",
            AuthFailure::InvalidToken => "INVALID_TOKEN",
            AuthFailure::UsernameTaken => "USERNAME_TAKEN",
        }
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed token")]
    Malformed,

    #[error("Token generation failed")]
    IssuanceFailed,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Expired => "TOKEN_EXPIRED",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::Malformed => "MALFORMED_TOKEN",
            TokenError::IssuanceFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

impl From<&jsonwebtoken::errors::Error> for TokenError {
    fn from(error: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}
