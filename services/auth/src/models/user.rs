//! User model and related functionality

use serde::Deserialize;
use sqlx::FromRow;

/// User entity as stored in the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    /// PHC-formatted hash, never the plaintext password
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Row to insert for a newly registered user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Registration payload
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// User login credentials
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
