//! In-memory `UserStore` backed by a map keyed by user id.
//!
//! Suitable for development and tests. Records are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sd_core::domain::entities::user::UserRecord;
use sd_core::errors::{AuthFailure, DomainError};
use sd_core::repositories::UserStore;

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    ///
    /// Later records with a duplicate id overwrite earlier ones.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Look a record up by id
    pub async fn get(&self, id: &str) -> Option<UserRecord> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn replace(&self, id: &str, user: UserRecord) -> Result<(), DomainError> {
        if user.id != id {
            return Err(DomainError::Validation {
                message: format!("record id {} does not match {}", user.id, id),
            });
        }

        let mut users = self.users.write().await;
        if users
            .values()
            .any(|other| other.id != id && other.username == user.username)
        {
            return Err(AuthFailure::UsernameTaken.into());
        }

        match users.get_mut(id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {}", id),
            }),
        }
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|other| other.username == user.username) {
            return Err(AuthFailure::UsernameTaken.into());
        }
        if users.contains_key(&user.id) {
            return Err(DomainError::Validation {
                message: format!("user id {} already exists", user.id),
            });
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}
