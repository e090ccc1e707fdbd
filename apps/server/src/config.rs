//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address.
    pub http_addr: SocketAddr,

    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Directory where generated report files are written.
    pub reports_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_addr: env::var("SKLAD_HTTP_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SKLAD_HTTP_ADDR".to_string()))?,

            database_path: env::var("SKLAD_DATABASE_PATH")
                .unwrap_or_else(|_| "sklad.db".to_string())
                .into(),

            reports_dir: env::var("SKLAD_REPORTS_DIR")
                .unwrap_or_else(|_| "reports".to_string())
                .into(),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.http_addr.port(), 8000);
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
    }
}
