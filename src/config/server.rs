//! HTTP server configuration.

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Bind address, environment, and request handling limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: Environment,

    /// Tracing env-filter directive for the subscriber.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whole-request timeout in seconds, applied as a router layer.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated CORS origins. Unset means permissive CORS,
    /// which is only acceptable outside production.
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl ServerConfig {
    /// The address to bind the listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured CORS origins, with blank entries dropped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,mentorlink=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
