//! MySQL implementation of the UserStore trait.
//!
//! Records live in the `users` table. The `password` column holds whatever
//! the configured hasher produced, so rows written by the previous backend
//! keep verifying under the legacy scheme.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use sd_core::domain::entities::user::UserRecord;
use sd_core::errors::{AuthFailure, DomainError};
use sd_core::repositories::UserStore;

use crate::database::DatabasePool;

/// MySQL implementation of UserStore
pub struct MySqlUserStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserStore {
    /// Create a new MySQL user store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create a store sharing the wrapped pool
    pub fn from_database(database: &DatabasePool) -> Self {
        Self::new(database.get_pool().clone())
    }

    /// Convert database row to UserRecord
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<UserRecord, DomainError> {
        Ok(UserRecord {
            id: row.try_get("id").map_err(|e| column_error("id", e))?,
            username: row
                .try_get("username")
                .map_err(|e| column_error("username", e))?,
            password_digest: row
                .try_get("password")
                .map_err(|e| column_error("password", e))?,
            role: row.try_get("role").map_err(|e| column_error("role", e))?,
            person_id: row
                .try_get("person_id")
                .map_err(|e| column_error("person_id", e))?,
        })
    }

    async fn exists(&self, id: &str) -> Result<bool, DomainError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(found.is_some())
    }
}

fn column_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Store {
        message: format!("Failed to get {}: {}", column, e),
    }
}

fn query_error(e: sqlx::Error) -> DomainError {
    DomainError::Store {
        message: format!("Database query failed: {}", e),
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DomainError> {
        // BINARY keeps the match exact under case-insensitive collations
        let query = r#"
            SELECT id, username, password, role, person_id
            FROM users
            WHERE username = BINARY ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, id: &str, user: UserRecord) -> Result<(), DomainError> {
        if user.id != id {
            return Err(DomainError::Validation {
                message: format!("record id {} does not match {}", user.id, id),
            });
        }

        let query = r#"
            UPDATE users
            SET username = ?, password = ?, role = ?, person_id = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(&user.password_digest)
            .bind(&user.role)
            .bind(&user.person_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    DomainError::from(AuthFailure::UsernameTaken)
                }
                other => query_error(other),
            })?;

        // MySQL reports changed rows, so an identical write also yields 0
        if result.rows_affected() == 0 && !self.exists(id).await? {
            return Err(DomainError::NotFound {
                resource: format!("user {}", id),
            });
        }

        tracing::debug!(user_id = %id, "User record replaced");
        Ok(())
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError> {
        let query = r#"
            INSERT INTO users (id, username, password, role, person_id)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_digest)
            .bind(&user.role)
            .bind(&user.person_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    DomainError::from(AuthFailure::UsernameTaken)
                }
                other => query_error(other),
            })?;

        tracing::debug!(user_id = %user.id, "User record created");
        Ok(user)
    }
}
