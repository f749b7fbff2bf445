//! Main credential authority implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sd_shared::validation::{is_valid_username, length_between, not_empty, MAX_PASSWORD_LENGTH};

use crate::domain::entities::token::TokenPayload;
use crate::domain::entities::user::UserRecord;
use crate::errors::{AuthFailure, DomainError, DomainResult, TokenError};
use crate::repositories::UserStore;
use crate::services::password::{PasswordGenerator, PasswordHasher};

use super::config::CredentialAuthorityConfig;

/// Verifies credentials, issues and verifies signed tokens, resets passwords
///
/// Stateless between calls: the secret, the keys and the password policy are
/// fixed at construction. Each operation performs at most one read and one
/// write against the store.
pub struct CredentialAuthority<S, H>
where
    S: UserStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Persistence boundary for user records
    store: Arc<S>,
    /// Password digest scheme
    hasher: Arc<H>,
    /// Generator for reset passwords
    generator: PasswordGenerator,
    config: CredentialAuthorityConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<S, H> CredentialAuthority<S, H>
where
    S: UserStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    /// Creates a new credential authority
    ///
    /// # Arguments
    ///
    /// * `store` - User store for credential records
    /// * `hasher` - Password digest scheme
    /// * `config` - Signing and password policy configuration
    ///
    /// # Returns
    ///
    /// The authority, or `DomainError::Validation` for an unusable
    /// configuration (empty secret, non-HMAC algorithm, non-positive
    /// lifetime, invalid password policy)
    pub fn new(
        store: Arc<S>,
        hasher: Arc<H>,
        config: CredentialAuthorityConfig,
    ) -> DomainResult<Self> {
        config.validate()?;
        let generator = PasswordGenerator::new(config.password_policy)?;

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            store,
            hasher,
            generator,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &CredentialAuthorityConfig {
        &self.config
    }

    /// Checks a username/password pair
    ///
    /// # Returns
    ///
    /// * `Ok(UserRecord)` - The password matches the stored digest
    /// * `Err(AuthFailure::NotFound)` - No user with that username
    /// * `Err(AuthFailure::BadCredentials)` - The password does not match
    ///
    /// A verified digest the hasher flags with `needs_rehash` is replaced by
    /// a fresh one, which is the only write this operation performs.
    pub async fn verify_credentials(
        &self,
        username: &str,
        candidate_password: &str,
    ) -> DomainResult<UserRecord> {
        let user = self.find_user(username).await?;

        if !self.hasher.verify(candidate_password, &user.password_digest)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthFailure::BadCredentials.into());
        }

        if self.hasher.needs_rehash(&user.password_digest) {
            return Ok(self.upgrade_digest(user, candidate_password).await);
        }

        Ok(user)
    }

    /// Stores a digest of the current scheme in place of a legacy one
    ///
    /// The login already succeeded, so a failed upgrade is logged and the
    /// record is returned unchanged.
    async fn upgrade_digest(&self, user: UserRecord, password: &str) -> UserRecord {
        let digest = match self.hasher.hash(password) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Digest upgrade skipped");
                return user;
            }
        };

        let mut upgraded = user.clone();
        upgraded.set_password_digest(digest);
        match self.store.replace(&user.id, upgraded.clone()).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %user.id,
                    scheme = self.hasher.scheme(),
                    "Password digest upgraded"
                );
                upgraded
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Digest upgrade failed");
                user
            }
        }
    }

    /// Issues a signed token for `user`, valid for the configured lifetime
    pub fn issue_token(&self, user: &UserRecord) -> DomainResult<String> {
        self.issue_token_at(user, Utc::now())
    }

    pub(crate) fn issue_token_at(
        &self,
        user: &UserRecord,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<String> {
        let payload =
            TokenPayload::for_user(user, &self.config.issuer, issued_at, self.config.token_ttl)?;
        self.encode_jwt(&payload)
    }

    /// Encodes claims into a JWT
    fn encode_jwt(&self, payload: &TokenPayload) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, payload, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            DomainError::Token(TokenError::IssuanceFailed)
        })
    }

    /// Verifies a token and returns its payload
    ///
    /// Malformed, tampered, foreign and expired tokens all yield
    /// `AuthFailure::InvalidToken`. Use [`Self::inspect_token`] for the
    /// precise reason.
    pub fn verify_token(&self, token: &str) -> DomainResult<TokenPayload> {
        self.inspect_token(token).map_err(|reason| {
            tracing::debug!(reason = %reason, "Token rejected");
            DomainError::Auth(AuthFailure::InvalidToken)
        })
    }

    /// Verifies a token, keeping the reason for a rejection
    pub fn inspect_token(&self, token: &str) -> Result<TokenPayload, TokenError> {
        decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::from(&e))
    }

    /// Replaces the user's password with a freshly generated one
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The new plaintext password, for one-time delivery
    /// * `Err(AuthFailure::NotFound)` - No user with that username
    ///
    /// Two concurrent resets of one user race at the store; the last write
    /// wins and only its password verifies afterwards.
    pub async fn reset_password(&self, username: &str) -> DomainResult<String> {
        let mut user = self.find_user(username).await?;

        let password = self.generator.generate();
        user.set_password_digest(self.hasher.hash(&password)?);

        let id = user.id.clone();
        self.store.replace(&id, user).await?;

        tracing::info!(user_id = %id, scheme = self.hasher.scheme(), "Password reset");
        Ok(password)
    }

    /// Digests a plaintext password with the configured scheme
    pub fn hash_password(&self, plaintext: &str) -> DomainResult<String> {
        self.hasher.hash(plaintext)
    }

    /// Generates a random password from the configured policy
    pub fn generate_password(&self) -> String {
        self.generator.generate()
    }

    /// Creates credentials for a new user
    ///
    /// # Arguments
    ///
    /// * `username` - Login name; an e-mail address for persons
    /// * `password` - Initial plaintext password
    /// * `role` - Authorization role
    /// * `person_id` - Linked person profile, if any
    ///
    /// # Returns
    ///
    /// * `Ok(UserRecord)` - The stored record
    /// * `Err(DomainError::Validation)` - Malformed username, empty or
    ///   over-long password, or a password the hasher refuses
    /// * `Err(AuthFailure::UsernameTaken)` - The username is in use
    pub async fn enroll(
        &self,
        username: &str,
        password: &str,
        role: &str,
        person_id: Option<String>,
    ) -> DomainResult<UserRecord> {
        if !is_valid_username(username) {
            return Err(DomainError::Validation {
                message: "username must be an e-mail address or a 3-64 character handle"
                    .to_string(),
            });
        }
        if !length_between(password, 1, MAX_PASSWORD_LENGTH) {
            return Err(DomainError::Validation {
                message: format!("password must be 1-{} characters", MAX_PASSWORD_LENGTH),
            });
        }
        if !not_empty(role) {
            return Err(DomainError::Validation {
                message: "role must not be empty".to_string(),
            });
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(AuthFailure::UsernameTaken.into());
        }

        let digest = self.hasher.hash(password)?;
        let user = self
            .store
            .create(UserRecord::new(username, digest, role, person_id))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Credentials enrolled");
        Ok(user)
    }

    async fn find_user(&self, username: &str) -> DomainResult<UserRecord> {
        match self.store.find_by_username(username).await? {
            Some(user) => Ok(user),
            None => {
                tracing::debug!("No user for the given username");
                Err(AuthFailure::NotFound.into())
            }
        }
    }
}
