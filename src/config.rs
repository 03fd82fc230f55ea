//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// SQLite URL for the document store; in-memory store when absent
    pub database_url: Option<String>,
    /// Bearer token guarding admin routes; admin routes are open when absent
    pub admin_token: Option<String>,
    /// Load default vocabularies and demo meetings into an empty store
    pub seed_data: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_URL` - e.g. `sqlite://./data/orbital.db` (default: unset, in-memory)
    /// - `ADMIN_TOKEN` - admin bearer token (default: unset)
    /// - `SEED_DATA` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: non_empty_var("DATABASE_URL"),
            admin_token: non_empty_var("ADMIN_TOKEN"),
            seed_data: env::var("SEED_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: None,
            admin_token: None,
            seed_data: true,
        }
    }
}
