//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Stripe Checkout
//! Sessions API. Session creation carries an `Idempotency-Key` header
//! so that handler-level retries never produce duplicate sessions, and
//! every request is bounded by the configured timeout.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeGatewayConfig::new(api_key, Duration::from_secs(10));
//! let gateway = StripeCheckoutGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::ports::{
    CheckoutSessionHandle, CheckoutSessionState, CreateCheckoutSessionRequest, GatewayError,
    PaymentGateway,
};

use super::types::StripeCheckoutSessionObject;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeGatewayConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Per-request timeout.
    request_timeout: Duration,
}

impl StripeGatewayConfig {
    pub fn new(api_key: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            request_timeout,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe checkout gateway adapter.
pub struct StripeCheckoutGateway {
    config: StripeGatewayConfig,
    http_client: reqwest::Client,
}

impl StripeCheckoutGateway {
    pub fn new(config: StripeGatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn map_send_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::timeout(e.to_string())
        } else {
            GatewayError::network(e.to_string())
        }
    }

    async fn map_error_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, error = %body, "Stripe API request failed");

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                GatewayError::authentication(format!("Stripe rejected credentials: {}", body))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                GatewayError::rate_limited(format!("Stripe rate limit hit: {}", body))
            }
            reqwest::StatusCode::BAD_REQUEST => {
                GatewayError::invalid_request(format!("Stripe rejected request: {}", body))
            }
            _ => GatewayError::provider(format!("Stripe API error ({}): {}", status, body)),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSessionHandle, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        for (key, value) in request.metadata.to_map() {
            params.push((format!("metadata[{}]", key), value));
        }

        let mut builder = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .timeout(self.config.request_timeout)
            .form(&params);

        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder.send().await.map_err(Self::map_send_error)?;

        if !response.status().is_success() {
            return Err(Self::map_error_response(response).await);
        }

        let session: StripeCheckoutSessionObject = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("Failed to parse Stripe response: {}", e)))?;

        let redirect_url = session
            .url
            .unwrap_or_else(|| format!("https://checkout.stripe.com/c/pay/{}", session.id));
        let expires_at = session
            .expires_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp() + 24 * 60 * 60);

        tracing::info!(reference = %session.id, "Stripe checkout session created");

        Ok(CheckoutSessionHandle {
            reference: session.id,
            redirect_url,
            expires_at,
        })
    }

    async fn get_checkout_session(
        &self,
        reference: &str,
    ) -> Result<Option<CheckoutSessionState>, GatewayError> {
        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base_url, reference
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(Self::map_error_response(response).await);
        }

        let session: StripeCheckoutSessionObject = response
            .json()
            .await
            .map_err(|e| GatewayError::provider(format!("Failed to parse Stripe response: {}", e)))?;

        Ok(Some(CheckoutSessionState {
            reference: session.id.clone(),
            status: session.checkout_status(),
            amount_cents: session.amount_total.unwrap_or(0),
            metadata: session.metadata,
        }))
    }
}
