//! MySQL-backed user repository

use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        debug!("Finding user by email: {}", email);

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, new_user: &NewUser) -> Result<i32, StoreError> {
        debug!("Inserting user: {}", new_user.email);

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, username, password)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        })?;

        // `id` is a signed INT column, so the assigned value always fits
        Ok(result.last_insert_id() as i32)
    }
}
