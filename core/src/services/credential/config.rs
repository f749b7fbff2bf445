//! Configuration for the credential authority

use chrono::Duration;
use jsonwebtoken::Algorithm;
use sd_shared::config::{AuthConfig, DEFAULT_JWT_SECRET};

use crate::domain::entities::token::{
    DEFAULT_TOKEN_TTL_SECONDS, JWT_ISSUER, MAX_TOKEN_TTL_SECONDS,
};
use crate::errors::{DomainError, DomainResult};
use crate::services::password::PasswordPolicy;

/// Configuration for the credential authority
#[derive(Debug, Clone)]
pub struct CredentialAuthorityConfig {
    /// JWT signing secret, the single trust root for every token
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Issuer written into and required from tokens
    pub issuer: String,
    /// Token lifetime
    pub token_ttl: Duration,
    /// Policy for passwords generated on reset
    pub password_policy: PasswordPolicy,
}

impl Default for CredentialAuthorityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            issuer: JWT_ISSUER.to_string(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl CredentialAuthorityConfig {
    /// Builds the authority configuration from the application auth section
    pub fn from_auth_config(auth: &AuthConfig) -> DomainResult<Self> {
        let algorithm = match auth.jwt.algorithm.to_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(DomainError::Validation {
                    message: format!("unsupported JWT algorithm: {}", other),
                })
            }
        };

        Ok(Self {
            jwt_secret: auth.jwt.secret.clone(),
            algorithm,
            issuer: auth.jwt.issuer.clone(),
            token_ttl: Duration::try_seconds(auth.jwt.token_ttl_seconds).ok_or_else(|| {
                DomainError::Validation {
                    message: format!(
                        "token lifetime of {} seconds is out of range",
                        auth.jwt.token_ttl_seconds
                    ),
                }
            })?,
            password_policy: PasswordPolicy::from(&auth.password_policy),
        })
    }

    pub(crate) fn validate(&self) -> DomainResult<()> {
        if self.jwt_secret.is_empty() {
            return Err(DomainError::Validation {
                message: "JWT secret must not be empty".to_string(),
            });
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Validation {
                message: format!("unsupported JWT algorithm: {:?}", self.algorithm),
            });
        }
        if self.token_ttl <= Duration::zero() {
            return Err(DomainError::Validation {
                message: "token lifetime must be positive".to_string(),
            });
        }
        if self.token_ttl > Duration::seconds(MAX_TOKEN_TTL_SECONDS) {
            return Err(DomainError::Validation {
                message: format!(
                    "token lifetime must not exceed {} seconds",
                    MAX_TOKEN_TTL_SECONDS
                ),
            });
        }
        Ok(())
    }
}
