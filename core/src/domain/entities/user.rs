//! User credential record as held by a `UserStore`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role given to users created through person registration
pub const ROLE_PERSON: &str = "person";

/// Credential record of a user
///
/// The password digest is never serialized, so a record can be handed to a
/// presentation layer as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: String,

    /// Login name, an e-mail address for persons
    pub username: String,

    /// Stored output of the password hasher
    #[serde(skip_serializing, default)]
    pub password_digest: String,

    /// Authorization role (e.g. "person", "admin")
    pub role: String,

    /// Linked person profile, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
}

impl UserRecord {
    /// Creates a new record with a fresh identifier
    pub fn new(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        role: impl Into<String>,
        person_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_digest: password_digest.into(),
            role: role.into(),
            person_id,
        }
    }

    /// Replaces the stored digest
    pub fn set_password_digest(&mut self, digest: impl Into<String>) {
        self.password_digest = digest.into();
    }

    /// Checks if the record belongs to a registered person
    pub fn is_person(&self) -> bool {
        self.role == ROLE_PERSON
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .field("role", &self.role)
            .field("person_id", &self.person_id)
            .finish()
    }
}
