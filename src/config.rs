//! Configuration management.
//!
//! flowrun configuration comes from environment variables (FLOWRUN_*) with
//! sensible defaults for local use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// flowrun configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound HTTP transport configuration
    #[serde(default)]
    pub http: HttpConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database. `None` selects an in-memory database.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

/// Outbound HTTP transport configuration.
///
/// The interpreter itself enforces no per-node timeout; an unresponsive
/// remote endpoint stalls the run until the transport gives up, so these
/// defaults are the only bound on how long an `http` node can block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds.
    #[serde(default = "default_http_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            connect_timeout_seconds: default_http_connect_timeout(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}

fn default_http_connect_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from FLOWRUN_* environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("FLOWRUN_DATABASE_PATH") {
            if !path.is_empty() {
                config.storage.database_path = Some(PathBuf::from(path));
            }
        }

        if let Some(timeout) = env_u64("FLOWRUN_HTTP_TIMEOUT_SECONDS") {
            config.http.timeout_seconds = timeout;
        }

        if let Some(timeout) = env_u64("FLOWRUN_HTTP_CONNECT_TIMEOUT_SECONDS") {
            config.http.connect_timeout_seconds = timeout;
        }

        config
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
