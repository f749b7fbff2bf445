//! Unit tests for domain error types

use crate::errors::{AuthFailure, DomainError, TokenError};

#[test]
fn test_auth_failure_messages() {
    assert_eq!(AuthFailure::NotFound.to_string(), "User not found");
    assert_eq!(AuthFailure::BadCredentials.to_string(), "Invalid credentials");
    assert_eq!(AuthFailure::InvalidToken.to_string(), "Invalid token");
}

#[test]
fn test_credential_failures_are_grouped() {
    assert!(AuthFailure::NotFound.is_credential_failure());
    assert!(AuthFailure::BadCredentials.is_credential_failure());
    assert!(!AuthFailure::InvalidToken.is_credential_failure());
    assert!(!AuthFailure::UsernameTaken.is_credential_failure());
}

#[test]
fn test_domain_error_bridges_auth_failure() {
    let error: DomainError = AuthFailure::BadCredentials.into();
    assert_eq!(error.auth_failure(), Some(AuthFailure::BadCredentials));
    assert_eq!(error.code(), "BAD_CREDENTIALS");
    // transparent: the message is the inner one
    assert_eq!(error.to_string(), "Invalid credentials");
}

#[test]
fn test_domain_error_codes() {
    let store = DomainError::Store {
        message: "connection reset".to_string(),
    };
    assert_eq!(store.code(), "STORE_ERROR");
    assert_eq!(store.auth_failure(), None);
    assert!(store.to_string().contains("connection reset"));

    let token: DomainError = TokenError::Expired.into();
    assert_eq!(token.code(), "TOKEN_EXPIRED");
}

#[test]
fn test_token_error_from_jwt_error() {
    use jsonwebtoken::errors::{Error, ErrorKind};

    let expired: Error = ErrorKind::ExpiredSignature.into();
    assert_eq!(TokenError::from(&expired), TokenError::Expired);

    let signature: Error = ErrorKind::InvalidSignature.into();
    assert_eq!(TokenError::from(&signature), TokenError::InvalidSignature);

    let malformed: Error = ErrorKind::InvalidToken.into();
    assert_eq!(TokenError::from(&malformed), TokenError::Malformed);
}
