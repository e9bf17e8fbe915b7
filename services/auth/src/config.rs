//! HTTP server configuration

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Address the service listens on
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: "0.0.0.0")
    /// - `PORT`: Port to listen on (default: 3000)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {value}"))?,
            Err(_) => 3000,
        };

        Ok(ServerConfig { host, port })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
