//! Credential service: registration and login against the user store

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    models::{LoginCredentials, NewUser, RegisterRequest},
    password,
    repositories::{StoreError, UserStore},
};

pub const USER_CREATED: &str = "User created successfully";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";

/// Failures of the credential flow, each tied to one HTTP status
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    /// 409, the email is already registered
    #[error("User already exists")]
    Conflict,

    /// 404, no user with this email
    #[error("User not found")]
    NotFound,

    /// 400, with the message shown to the client
    #[error("{0}")]
    BadRequest(String),

    /// 500, with the message shown to the client
    #[error("{0}")]
    Internal(&'static str),
}

impl CredentialError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CredentialError::Conflict => StatusCode::CONFLICT,
            CredentialError::NotFound => StatusCode::NOT_FOUND,
            CredentialError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CredentialError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn query_failed(e: StoreError) -> Self {
        error!("Database query error: {}", e);
        CredentialError::Internal("Database query error")
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        error!("Internal error: {}", e);
        CredentialError::Internal("Internal Server Error")
    }
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_string())).into_response()
    }
}

/// Register and log in users against an injected store
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn UserStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create a user unless the email is taken.
    ///
    /// The lookup is only a fast path; the unique constraint on `email` is
    /// what finally rejects a duplicate written by a concurrent request.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), CredentialError> {
        info!("Registration attempt for email: {}", request.email);

        let existing = self
            .store
            .find_by_email(&request.email)
            .await
            .map_err(CredentialError::query_failed)?;

        if existing.is_some() {
            warn!("Registration rejected, email already registered: {}", request.email);
            return Err(CredentialError::Conflict);
        }

        let RegisterRequest {
            email,
            username,
            password,
        } = request;

        let password_hash = hash_blocking(password).await?;

        let new_user = NewUser {
            email,
            username,
            password_hash,
        };

        match self.store.insert(&new_user).await {
            Ok(id) => {
                info!(user_id = id, "Created user: {}", new_user.email);
                Ok(())
            }
            Err(StoreError::DuplicateEmail) => {
                warn!("Insert hit unique email constraint: {}", new_user.email);
                Err(CredentialError::Conflict)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(CredentialError::bad_request("Something went wrong"))
            }
        }
    }

    /// Check an email and password pair. No session is created.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<(), CredentialError> {
        info!("Login attempt for email: {}", credentials.email);

        let user = self
            .store
            .find_by_email(&credentials.email)
            .await
            .map_err(CredentialError::query_failed)?
            .ok_or_else(|| {
                info!("Login failed, unknown email: {}", credentials.email);
                CredentialError::NotFound
            })?;

        let valid = verify_blocking(user.password_hash, credentials.password).await?;
        if !valid {
            info!(user_id = user.id, "Login failed, wrong password");
            return Err(CredentialError::bad_request("Invalid username or password"));
        }

        info!(user_id = user.id, username = %user.username, "Login successful");
        Ok(())
    }
}

// Argon2 is CPU-bound, so both calls run on the blocking pool.
async fn hash_blocking(password: String) -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(CredentialError::internal)?
        .map_err(CredentialError::internal)
}

async fn verify_blocking(stored_hash: String, password: String) -> Result<bool, CredentialError> {
    tokio::task::spawn_blocking(move || password::verify_password(&stored_hash, &password))
        .await
        .map_err(CredentialError::internal)?
        .map_err(CredentialError::internal)
}
