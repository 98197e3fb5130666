//! Payment gateway configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment gateway configuration (Stripe Checkout)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Settlement currency for checkout sessions
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Per-call timeout for gateway requests, in seconds
    #[serde(default = "default_gateway_timeout")]
    pub gateway_timeout_secs: u64,

    /// Maximum attempts for a retryable gateway call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between retry attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Get the per-call gateway timeout as Duration
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    /// Get the base retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        // Verify key prefix for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.gateway_timeout_secs == 0 || self.gateway_timeout_secs > 60 {
            return Err(ValidationError::InvalidGatewayTimeout);
        }
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(ValidationError::InvalidGatewayAttempts);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            currency: default_currency(),
            gateway_timeout_secs: default_gateway_timeout(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_gateway_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    250
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_mode() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = PaymentConfig {
            stripe_api_key: "sk_live_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        let config = PaymentConfig {
            stripe_api_key: "pk_test_xxx".to_string(), // Wrong prefix
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_currency() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            currency: "dollars".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            gateway_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            gateway_timeout_secs: 120,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_abcd1234".to_string(),
            currency: "eur".to_string(),
            gateway_timeout_secs: 15,
            max_attempts: 5,
            retry_delay_ms: 100,
        };
        assert!(config.validate().is_ok());
    }
}
