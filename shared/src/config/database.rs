//! Database configuration module

use serde::{Deserialize, Serialize};

use super::env_parse;

/// Backend holding user credential records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStoreBackend {
    /// Process-local map, lost on restart
    Memory,
    /// MySQL `users` table
    MySql,
}

impl Default for UserStoreBackend {
    fn default() -> Self {
        UserStoreBackend::Memory
    }
}

impl std::str::FromStr for UserStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(UserStoreBackend::Memory),
            "mysql" => Ok(UserStoreBackend::MySql),
            _ => Err(format!("Invalid user store backend: {}", s)),
        }
    }
}

/// Database configuration for MySQL connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Which user store the composition root builds
    #[serde(default)]
    pub backend: UserStoreBackend,

    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: UserStoreBackend::default(),
            url: String::from("mysql://localhost:3306/sociald"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the user store backend
    pub fn with_backend(mut self, backend: UserStoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub(crate) fn overlay_env(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.url = url;
        }
        if let Some(max) = env_parse("DATABASE_MAX_CONNECTIONS") {
            self.max_connections = max;
        }
        if let Some(timeout) = env_parse("DATABASE_CONNECT_TIMEOUT") {
            self.connect_timeout = timeout;
        }
        if let Some(backend) = env_parse("USER_STORE") {
            self.backend = backend;
        }
        self
    }
}
