use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod models;
mod password;
mod repositories;
mod routes;
mod service;
mod validation;

use std::sync::Arc;

use common::database::{DatabaseConfig, health_check};
use tokio::net::TcpListener;

use crate::{config::ServerConfig, repositories::UserRepository, service::CredentialService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credential_service: CredentialService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine, variables may come from the environment
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    let server_config = ServerConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let pool = database::bootstrap(&db_config).await?;

    // Check database connectivity
    match health_check(&pool).await {
        Ok(_) => info!("Database connection successful"),
        Err(e) => {
            error!("Database health check failed: {}", e);
            anyhow::bail!("Failed to connect to database");
        }
    }

    let user_repository = UserRepository::new(pool);
    let app_state = AppState {
        credential_service: CredentialService::new(Arc::new(user_repository)),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = server_config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Authentication service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
