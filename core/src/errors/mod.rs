//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{AuthFailure, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("User store error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// The authentication outcome carried by this error, if any
    pub fn auth_failure(&self) -> Option<AuthFailure> {
        match self {
            DomainError::Auth(failure) => Some(*failure),
            _ => None,
        }
    }

    /// Stable machine-readable error code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Store { .. } => "STORE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(failure) => failure.code(),
            DomainError::Token(error) => error.code(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
