//! # Sociald Core
//!
//! Core domain layer for the Sociald backend.
//! This crate contains the credential entities, the credential authority,
//! password hashing and generation, the user store interface, and the error
//! types the outer layers map to responses.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{TokenPayload, UserRecord, ROLE_PERSON};
pub use errors::{AuthFailure, DomainError, DomainResult, TokenError};
pub use repositories::UserStore;
pub use services::{
    CredentialAuthority, CredentialAuthorityConfig, PasswordGenerator, PasswordHasher,
    PasswordPolicy,
};
