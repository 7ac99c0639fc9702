//! HTTP server configuration

use std::env;

use anyhow::{Context, Result};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APP_HOST`: bind address (default: `0.0.0.0`)
    /// - `APP_PORT`: bind port (default: 5000)
    pub fn from_env() -> Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("APP_PORT must be a port number, got {raw}"))?,
            Err(_) => 5000,
        };

        Ok(Self { host, port })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
