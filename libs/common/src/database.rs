//! Database module for handling MySQL connections and operations
//!
//! This module provides connection configuration, pooling, and health checks
//! for the MySQL server backing the services.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::{
    MySqlPool,
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
};
use std::env;
use std::time::Duration;
use tracing::info;

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// MySQL server host
    pub host: String,
    /// MySQL server port
    pub port: u16,
    /// User to authenticate as
    pub user: String,
    /// Password for `user`, empty when the account has none
    pub password: String,
    /// Name of the application database
    pub database: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Seconds to wait for a connection before giving up
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `DB_HOST`: MySQL server host (required)
    /// - `DB_USER`: MySQL user (required)
    /// - `DB_PASSWORD`: MySQL password (default: empty)
    /// - `DB_PORT`: MySQL server port (default: 3306)
    /// - `DB_NAME`: Application database name (default: "expense_tracker")
    /// - `DATABASE_MAX_CONNECTIONS`: Maximum number of connections (default: 5)
    /// - `DATABASE_CONNECTION_TIMEOUT`: Connection timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let host = env::var("DB_HOST").map_err(|_| {
            DatabaseError::Configuration("DB_HOST environment variable not set".to_string())
        })?;

        let user = env::var("DB_USER").map_err(|_| {
            DatabaseError::Configuration("DB_USER environment variable not set".to_string())
        })?;

        let password = env::var("DB_PASSWORD").unwrap_or_default();

        let port = env::var("DB_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3306);

        let database = env::var("DB_NAME").unwrap_or_else(|_| "expense_tracker".to_string());
        validate_database_name(&database)?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let connection_timeout = env::var("DATABASE_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            max_connections,
            connection_timeout,
        })
    }

    /// Connection options for the server itself, without selecting a database
    pub fn server_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// Connection options with the application database selected
    pub fn database_options(&self) -> MySqlConnectOptions {
        self.server_options().database(&self.database)
    }
}

/// The database name is interpolated into DDL, so only plain identifiers are accepted.
fn validate_database_name(name: &str) -> DatabaseResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DatabaseError::Configuration(format!(
            "Invalid database name: {:?}",
            name
        )));
    }

    Ok(())
}

/// Open a single connection to the server without a database selected.
///
/// Used for bootstrap statements such as `CREATE DATABASE`.
pub async fn connect_server(config: &DatabaseConfig) -> DatabaseResult<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(config.server_options())
        .await
        .map_err(DatabaseError::Connection)
}

/// Initialize a MySQL connection pool on the application database
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<MySqlPool>` - MySQL connection pool or error
pub async fn init_pool(config: &DatabaseConfig) -> DatabaseResult<MySqlPool> {
    info!(
        host = %config.host,
        database = %config.database,
        "Initializing database connection pool"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(config.database_options())
        .await
        .map_err(DatabaseError::Connection)?;

    info!("Database connection pool initialized successfully");
    Ok(pool)
}

/// Check database connectivity
///
/// # Arguments
///
/// * `pool` - MySQL connection pool
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if connection is successful
pub async fn health_check(pool: &MySqlPool) -> DatabaseResult<bool> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(true)
}
