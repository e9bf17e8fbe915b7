//! User store port and its implementations

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod user;

#[cfg(test)]
pub use memory::InMemoryUserStore;
pub use user::UserRepository;

/// Errors surfaced by a user store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The unique constraint on `email` rejected the write
    #[error("A user with this email already exists")]
    DuplicateEmail,

    /// Any other failure talking to the store
    #[error("User store error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations needed by the credential service
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by exact email match
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user and return its assigned id
    async fn insert(&self, new_user: &NewUser) -> Result<i32, StoreError>;
}
