//! Composition root: turns an `AppConfig` into a ready credential authority.

use std::sync::Arc;

use sd_core::services::{hasher_for_config, CredentialAuthority, CredentialAuthorityConfig};
use sd_core::{PasswordHasher, UserStore};
use sd_shared::config::{AppConfig, UserStoreBackend};

use crate::memory::InMemoryUserStore;
use crate::InfrastructureError;

/// Authority with the store and hasher picked at runtime
pub type SharedAuthority = Arc<CredentialAuthority<dyn UserStore, dyn PasswordHasher>>;

/// Load `.env` files and read the configuration from the environment
///
/// The environment-specific file (e.g. `.env.production`) is read first so
/// its values win over the generic `.env`. Variables already set in the
/// process are never overridden.
pub fn load_config() -> AppConfig {
    let environment = sd_shared::config::Environment::from_env();
    if dotenvy::from_filename(environment.env_file()).is_ok() {
        tracing::debug!(file = environment.env_file(), "Loaded environment file");
    }
    dotenvy::dotenv().ok();

    AppConfig::from_env()
}

/// Build the user store selected by `config.database.backend`
pub async fn build_user_store(config: &AppConfig) -> Result<Arc<dyn UserStore>, InfrastructureError> {
    match config.database.backend {
        UserStoreBackend::Memory => {
            tracing::info!("Using in-memory user store");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
        #[cfg(feature = "mysql")]
        UserStoreBackend::MySql => {
            let pool = crate::database::DatabasePool::new(&config.database).await?;
            pool.run_migrations().await?;
            tracing::info!("Using MySQL user store");
            Ok(Arc::new(crate::database::MySqlUserStore::from_database(&pool)))
        }
        #[cfg(not(feature = "mysql"))]
        UserStoreBackend::MySql => Err(InfrastructureError::Config(
            "MySQL backend requested but the `mysql` feature is disabled".to_string(),
        )),
    }
}

/// Build an authority over the given store from the auth section of `config`
pub fn build_authority(
    config: &AppConfig,
    store: Arc<dyn UserStore>,
) -> Result<SharedAuthority, InfrastructureError> {
    config.validate().map_err(InfrastructureError::Config)?;

    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("Using the default JWT secret, set JWT_SECRET outside development");
    }

    let hasher = hasher_for_config(&config.auth)?;
    let authority_config = CredentialAuthorityConfig::from_auth_config(&config.auth)?;
    let authority = CredentialAuthority::new(store, hasher, authority_config)?;

    tracing::info!(
        environment = %config.environment,
        password_scheme = %config.auth.password_scheme,
        issuer = %config.auth.jwt.issuer,
        "Credential authority ready"
    );

    Ok(Arc::new(authority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_shared::config::{JwtConfig, PasswordScheme};

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::development();
        config.auth.jwt = JwtConfig::new("bootstrap-test-secret");
        config
    }

    #[tokio::test]
    async fn test_memory_backend_builds() {
        let config = memory_config();
        let store = build_user_store(&config).await.unwrap();
        let authority = build_authority(&config, store).unwrap();

        let digest = authority.hash_password("password").unwrap();
        assert_eq!(digest, "696d29e0940a4957748fe3fc9efd22a3");
    }

    #[test]
    fn test_production_default_secret_is_refused() {
        let mut config = AppConfig::production();
        config.auth.jwt = JwtConfig::default();

        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let result = build_authority(&config, store);
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }

    #[test]
    fn test_bad_bcrypt_cost_is_a_domain_error() {
        let mut config = memory_config();
        config.auth.password_scheme = PasswordScheme::Bcrypt;
        config.auth.bcrypt_cost = 2;

        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let result = build_authority(&config, store);
        assert!(matches!(result, Err(InfrastructureError::Domain(_))));
    }
}
