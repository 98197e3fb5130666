//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Host and port do not form a valid bind address")]
    InvalidBindAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds the supported maximum")]
    PoolSizeTooLarge,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid currency code (expected a 3-letter ISO code)")]
    InvalidCurrency,

    #[error("Invalid gateway timeout (expected 1-60 seconds)")]
    InvalidGatewayTimeout,

    #[error("Invalid gateway retry attempts (expected 1-10)")]
    InvalidGatewayAttempts,
}
