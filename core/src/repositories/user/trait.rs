//! User store trait defining the persistence boundary for credentials.
//!
//! The credential authority only needs lookup by username, full-record
//! replace and creation. Implementations own atomicity: two concurrent
//! replaces of the same record resolve as last-write-wins.

use async_trait::async_trait;

use crate::domain::entities::user::UserRecord;
use crate::errors::DomainError;

/// Repository trait for user credential records
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use sd_core::repositories::UserStore;
/// use sd_core::domain::entities::user::UserRecord;
/// use sd_core::errors::DomainError;
///
/// struct MySqlUserStore {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserStore for MySqlUserStore {
///     async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError> {
///         // Implementation here
///         Ok(None)
///     }
///
///     async fn replace(&self, id: &str, user: UserRecord) -> Result<(), DomainError> {
///         Ok(())
///     }
///
///     async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError> {
///         Ok(user)
///     }
/// }
/// ```
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user whose username matches exactly
    ///
    /// # Returns
    /// * `Ok(Some(UserRecord))` - User found
    /// * `Ok(None)` - No user with that username
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Replace the whole record stored under `id`
    ///
    /// # Returns
    /// * `Ok(())` - Record replaced
    /// * `Err(DomainError::NotFound)` - No record with that id
    /// * `Err(DomainError::Validation)` - `user.id` differs from `id`
    /// * `Err(DomainError)` - Storage failure
    async fn replace(&self, id: &str, user: UserRecord) -> Result<(), DomainError>;

    /// Insert a new record
    ///
    /// # Returns
    /// * `Ok(UserRecord)` - The stored record
    /// * `Err(DomainError::Auth(AuthFailure::UsernameTaken))` - Username in use
    /// * `Err(DomainError)` - Storage failure
    async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError>;
}
