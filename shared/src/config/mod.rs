//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing, password scheme and generated-password policy
//! - `database` - User store backend and MySQL pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{
    AuthConfig, JwtConfig, PasswordPolicyConfig, PasswordScheme, DEFAULT_JWT_SECRET,
    MAX_TOKEN_TTL_SECONDS,
};
pub use database::{DatabaseConfig, UserStoreBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/sociald_dev"),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/sociald")
                .with_max_connections(50)
                .with_backend(UserStoreBackend::MySql),
            auth: AuthConfig {
                // JWT_SECRET must replace the default, validate() refuses it
                jwt: JwtConfig::default(),
                password_scheme: PasswordScheme::Bcrypt,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    ///
    /// Starts from the preset of the detected environment and overlays any
    /// variables that are set.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.database = config.database.overlay_env();
        config.auth = config.auth.overlay_env();
        config.logging = config.logging.overlay_env();
        config
    }

    /// Check the configuration for settings that must not reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt.secret.trim().is_empty() {
            return Err("JWT secret must not be empty".to_string());
        }
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.auth.jwt.token_ttl_seconds <= 0 {
            return Err("JWT token lifetime must be positive".to_string());
        }
        if self.auth.jwt.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(format!(
                "JWT token lifetime must not exceed {} seconds",
                MAX_TOKEN_TTL_SECONDS
            ));
        }
        Ok(())
    }
}

/// Read an environment variable and parse it, ignoring unset or invalid values
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag, accepting `true/false`, `1/0`, `yes/no` and `on/off`
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_preset_uses_mysql_and_bcrypt() {
        let config = AppConfig::production();
        assert_eq!(config.database.backend, UserStoreBackend::MySql);
        assert_eq!(config.auth.password_scheme, PasswordScheme::Bcrypt);
        assert!(config.environment.is_production());
    }

    #[test]
    fn test_validate_rejects_default_secret_in_production() {
        let mut config = AppConfig::production();
        config.auth.jwt = JwtConfig::default();
        assert!(config.validate().is_err());

        config.auth.jwt = JwtConfig::new("a-real-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_development_defaults() {
        assert!(AppConfig::development().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let mut config = AppConfig::development();
        config.auth.jwt.token_ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_lifetime_above_one_year() {
        let mut config = AppConfig::development();
        config.auth.jwt.token_ttl_seconds = MAX_TOKEN_TTL_SECONDS + 1;
        assert!(config.validate().is_err());

        config.auth.jwt.token_ttl_seconds = i64::MAX;
        assert!(config.validate().is_err());

        config.auth.jwt.token_ttl_seconds = MAX_TOKEN_TTL_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::development();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.auth.jwt.issuer, config.auth.jwt.issuer);
        assert_eq!(back.database.url, config.database.url);
    }
}
