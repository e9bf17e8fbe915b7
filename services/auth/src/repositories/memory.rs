//! In-memory user store used by tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{StoreError, UserStore};
use crate::models::{NewUser, User};

/// Vector-backed store that enforces email uniqueness on insert like the
/// real table does, and can be told to fail.
///
/// Emails compare ASCII case-insensitively, matching the default MySQL
/// collation behind `WHERE email = ?` and the `UNIQUE` constraint.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    fail_lookups: AtomicBool,
    fail_inserts: AtomicBool,
    /// Hide existing rows from lookups, simulating a concurrent insert that
    /// lands between the existence check and the write.
    hide_from_lookups: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::Relaxed);
    }

    pub fn set_hide_from_lookups(&self, hide: bool) {
        self.hide_from_lookups.store(hide, Ordering::Relaxed);
    }

    pub fn count_by_email(&self, email: &str) -> usize {
        self.users
            .lock()
            .expect("store lock")
            .iter()
            .filter(|u| u.email.eq_ignore_ascii_case(email))
            .count()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .expect("store lock")
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().expect("store lock").len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        if self.fail_lookups.load(Ordering::Relaxed) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if self.hide_from_lookups.load(Ordering::Relaxed) {
            return Ok(None);
        }
        Ok(self.get_by_email(email))
    }

    async fn insert(&self, new_user: &NewUser) -> Result<i32, StoreError> {
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        let mut users = self.users.lock().expect("store lock");
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&new_user.email)) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = users.len() as i32 + 1;
        users.push(User {
            id,
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
        });

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_emails_match_case_insensitively() {
        let store = InMemoryUserStore::new();
        store.insert(&new_user("a@x.com")).await.unwrap();

        let found = store.find_by_email("A@X.com").await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("a@x.com".to_string()));

        let err = store.insert(&new_user("A@x.COM")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.count_by_email("A@X.COM"), 1);
    }
}
