//! Schema bootstrap for the authentication service
//!
//! Creates the application database and the `users` table when they are
//! missing. Every statement is create-if-absent, so running it against an
//! initialised server is a no-op.

use anyhow::{Context, Result};
use common::{
    database::{self, DatabaseConfig},
    error::DatabaseError,
};
use sqlx::MySqlPool;
use tracing::{error, info};

/// DDL for the credentials table
pub const USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(100) NOT NULL UNIQUE,
        username VARCHAR(50) NOT NULL,
        password VARCHAR(255)
    )
"#;

fn create_database_sql(name: &str) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", name)
}

/// Create the named database on a server connection if it is missing
pub async fn create_database(server: &MySqlPool, name: &str) -> Result<(), DatabaseError> {
    sqlx::query(&create_database_sql(name))
        .execute(server)
        .await
        .map_err(DatabaseError::Schema)?;

    info!("Database {} is ready", name);
    Ok(())
}

/// Ensure the `users` table exists in the pool's database
pub async fn ensure_users_table(pool: &MySqlPool) -> Result<(), DatabaseError> {
    sqlx::query(USERS_TABLE)
        .execute(pool)
        .await
        .map_err(DatabaseError::Schema)?;

    info!("Table users is ready");
    Ok(())
}

/// Run the full bootstrap and return a pool on the application database.
///
/// Failures are logged here and returned with context so startup can report
/// which step went wrong.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<MySqlPool> {
    let server = database::connect_server(config)
        .await
        .inspect_err(|e| error!("Error connecting to mysql: {}", e))
        .context("failed to connect to mysql server")?;
    info!(host = %config.host, "Connected to mysql");

    let created = create_database(&server, &config.database).await;
    server.close().await;
    created
        .inspect_err(|e| error!("Error creating database: {}", e))
        .context("failed to create database")?;

    let pool = database::init_pool(config)
        .await
        .inspect_err(|e| error!("Error selecting the database: {}", e))
        .context("failed to connect to the application database")?;

    ensure_users_table(&pool)
        .await
        .inspect_err(|e| error!("Error creating the users table: {}", e))
        .context("failed to create users table")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_create_database_sql() {
        assert_eq!(
            create_database_sql("expense_tracker"),
            "CREATE DATABASE IF NOT EXISTS expense_tracker"
        );
    }

    #[test]
    fn test_users_table_ddl() {
        assert!(USERS_TABLE.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(USERS_TABLE.contains("email VARCHAR(100) NOT NULL UNIQUE"));
        assert!(USERS_TABLE.contains("id INT AUTO_INCREMENT PRIMARY KEY"));
    }

    #[tokio::test]
    async fn test_bootstrap_reports_unreachable_server_as_connect_failure() {
        // Nothing listens on port 1, so the very first step fails
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "root".to_string(),
            password: String::new(),
            database: "expense_tracker".to_string(),
            max_connections: 1,
            connection_timeout: 1,
        };

        let err = bootstrap(&config).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to connect to mysql server");
        assert!(matches!(
            err.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::Connection(_))
        ));
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires a running MySQL server"]
    async fn test_bootstrap_is_idempotent() -> Result<()> {
        let config = DatabaseConfig::from_env()?;

        let pool = bootstrap(&config).await?;
        pool.close().await;

        // Second run must not fail on existing objects
        let pool = bootstrap(&config).await?;
        assert!(database::health_check(&pool).await?);
        Ok(())
    }
}
