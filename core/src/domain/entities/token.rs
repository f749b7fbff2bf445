//! Token payload for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub use sd_shared::config::MAX_TOKEN_TTL_SECONDS;

use super::user::UserRecord;
use crate::errors::TokenError;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Default JWT issuer
pub const JWT_ISSUER: &str = "sociald";

/// Claims embedded in a signed authentication token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject (user ID)
    #[serde(rename = "sub")]
    pub subject_id: String,

    /// Username at issuance time
    pub username: String,

    /// Role at issuance time
    pub role: String,

    /// Linked person profile
    #[serde(rename = "personId", default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,

    /// Issuer
    pub iss: String,

    /// Issued at timestamp (seconds since the epoch)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration timestamp (seconds since the epoch)
    #[serde(rename = "exp")]
    pub expiry: i64,
}

impl TokenPayload {
    /// Creates claims for `user`, valid for `ttl` from `issued_at`
    ///
    /// Fails with `TokenError::IssuanceFailed` when the expiry falls outside
    /// the representable date range.
    pub fn for_user(
        user: &UserRecord,
        issuer: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expiry = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::IssuanceFailed)?;

        Ok(Self {
            subject_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            person_id: user.person_id.clone(),
            iss: issuer.to_string(),
            issued_at: issued_at.timestamp(),
            expiry: expiry.timestamp(),
        })
    }

    /// The expiry as an absolute instant
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expiry, 0).single()
    }

    /// Checks if the payload has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expiry
    }

    /// Checks if the subject fields match `user`
    pub fn describes(&self, user: &UserRecord) -> bool {
        self.subject_id == user.id
            && self.username == user.username
            && self.role == user.role
            && self.person_id == user.person_id
    }
}
