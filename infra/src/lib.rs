//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Sociald credential
//! authority. It provides concrete user stores, the database pool, tracing
//! initialisation and the composition root.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL `UserStore` using SQLx
//! - **Memory**: process-local `UserStore` for development and tests
//! - **Telemetry**: `tracing-subscriber` set-up from `LoggingConfig`
//! - **Bootstrap**: wiring an authority from `AppConfig`
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use sd_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory user store
pub mod memory;

/// Tracing subscriber initialisation
pub mod telemetry;

/// Composition root
pub mod bootstrap;

pub use bootstrap::{build_authority, build_user_store, load_config, SharedAuthority};
pub use memory::InMemoryUserStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised while building domain services
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
