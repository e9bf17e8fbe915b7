//! Request validation
//!
//! Only presence is checked: a field must be supplied and non-empty.

use crate::{
    models::{LoginCredentials, RegisterRequest},
    service::CredentialError,
};

fn require(field: &str, value: &str) -> Result<(), CredentialError> {
    if value.is_empty() {
        return Err(CredentialError::bad_request(format!("{} is required", field)));
    }

    Ok(())
}

/// Validate a registration payload
pub fn validate_register(request: &RegisterRequest) -> Result<(), CredentialError> {
    require("Email", &request.email)?;
    require("Username", &request.username)?;
    require("Password", &request.password)
}

/// Validate login credentials
pub fn validate_login(credentials: &LoginCredentials) -> Result<(), CredentialError> {
    require("Email", &credentials.email)?;
    require("Password", &credentials.password)
}
