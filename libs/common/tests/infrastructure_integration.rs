//! Integration tests for the database infrastructure
//!
//! These tests need a reachable MySQL server configured through `DB_HOST`,
//! `DB_USER` and `DB_PASSWORD`. Run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, connect_server, health_check, init_pool};
use sqlx::Row;

/// Verifies the server is reachable and the application database can be used
#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;

    // The application database may not exist yet on a fresh server
    let server = connect_server(&config).await?;
    sqlx::query(&format!("CREATE DATABASE IF NOT EXISTS {}", config.database))
        .execute(&server)
        .await?;
    server.close().await;

    let pool = init_pool(&config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 AS result").fetch_one(&pool).await?;
    let result: i64 = row.get("result");
    assert_eq!(result, 1, "MySQL simple query test failed");

    Ok(())
}
