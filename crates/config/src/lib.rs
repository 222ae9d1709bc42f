//! Process-level configuration for the Rotasched API, loaded from the
//! environment once at startup. Distinct from `rotasched_domain::AppConfiguration`,
//! the business-level `configuration/main` document read from the store on
//! every run.

use serde::Deserialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Process-level configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address to bind the server to
    pub bind_address: String,
    /// Shared admin key every RPC route requires. Empty disables the API entirely.
    pub admin_api_key: String,
    /// `tracing_subscriber::EnvFilter` directive string
    pub log_filter: String,
    /// Directory the in-memory store reference adapter uses for local fixture seeding
    pub data_dir: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_address: env_var_or("BIND_ADDRESS", "0.0.0.0:8080"),
            admin_api_key: env_var("ADMIN_API_KEY")?,
            log_filter: env_var_or("LOG_FILTER", "info"),
            data_dir: env_var_or("DATA_DIR", "./data"),
        })
    }
}

fn env_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
