//! Authentication service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::{
    AppState,
    models::{LoginCredentials, RegisterRequest},
    service::{CredentialError, LOGIN_SUCCESSFUL, USER_CREATED},
    validation,
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, CredentialError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        CredentialError::bad_request("Invalid request body")
    })
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CredentialError> {
    let request = parse_body(payload)?;
    validation::validate_register(&request)?;

    state.credential_service.register(request).await?;

    Ok((StatusCode::OK, Json(USER_CREATED)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> Result<impl IntoResponse, CredentialError> {
    let credentials = parse_body(payload)?;
    validation::validate_login(&credentials)?;

    state.credential_service.login(credentials).await?;

    Ok((StatusCode::OK, Json(LOGIN_SUCCESSFUL)))
}
