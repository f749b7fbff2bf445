//! Credential authority module
//!
//! This module provides the authentication core of the backend:
//! - Credential verification against a `UserStore`
//! - Signed token issuance and verification
//! - Password reset with policy-driven random passwords
//! - Enrolment of new credentials

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::CredentialAuthorityConfig;
pub use service::CredentialAuthority;
