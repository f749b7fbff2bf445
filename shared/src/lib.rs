//! Shared utilities and common types for the Sociald server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Input validation utilities

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    PasswordPolicyConfig, PasswordScheme, UserStoreBackend,
};
pub use utils::validation;
