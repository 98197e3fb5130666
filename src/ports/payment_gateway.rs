//! Payment gateway port for hosted checkout processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe
//! Checkout). The booking flow only needs two calls: create a hosted
//! checkout session and fetch one back by reference.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any hosted-checkout provider
//! - **Idempotent**: Session creation accepts an idempotency key so
//!   retries cannot mint duplicate sessions
//! - **Metadata round-trip**: The session carries everything needed to
//!   reconstruct the booking after payment

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::catalog::SessionLength;
use crate::domain::foundation::{BuyerId, MentorId, ValidationError};
use crate::domain::scheduling::Slot;

/// Port for payment gateway integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// Returns a handle with the redirect URL for the buyer. Passing the
    /// same idempotency key again must return the original session.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSessionHandle, GatewayError>;

    /// Fetch a checkout session by its reference.
    ///
    /// Returns `None` if the gateway has no session for the reference.
    async fn get_checkout_session(
        &self,
        reference: &str,
    ) -> Result<Option<CheckoutSessionState>, GatewayError>;
}

/// Booking details carried through the gateway as session metadata.
///
/// Must be sufficient to reconstruct the booking at reconciliation time
/// without any local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    pub buyer_id: BuyerId,
    pub mentor_id: MentorId,
    pub product: SessionLength,
    pub slot: Slot,
}

impl CheckoutMetadata {
    const KEY_BUYER: &'static str = "buyer_id";
    const KEY_MENTOR: &'static str = "mentor_id";
    const KEY_PRODUCT: &'static str = "product_id";
    const KEY_SLOT_DATE: &'static str = "slot_date";
    const KEY_SLOT_TIME: &'static str = "slot_time";

    /// Serializes the metadata as flat string pairs for the gateway.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (Self::KEY_BUYER.to_string(), self.buyer_id.to_string()),
            (Self::KEY_MENTOR.to_string(), self.mentor_id.to_string()),
            (
                Self::KEY_PRODUCT.to_string(),
                self.product.product_id().to_string(),
            ),
            (Self::KEY_SLOT_DATE.to_string(), self.slot.date.to_string()),
            (
                Self::KEY_SLOT_TIME.to_string(),
                self.slot.start.format("%H:%M").to_string(),
            ),
        ])
    }

    /// Parses metadata back from gateway string pairs.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let get = |key: &'static str| -> Result<&str, ValidationError> {
            map.get(key)
                .map(String::as_str)
                .ok_or_else(|| ValidationError::empty_field(key))
        };

        let buyer_id = BuyerId::new(get(Self::KEY_BUYER)?)?;
        let mentor_id = get(Self::KEY_MENTOR)?
            .parse::<MentorId>()
            .map_err(|e| ValidationError::invalid_format(Self::KEY_MENTOR, e.to_string()))?;
        let product = SessionLength::from_product_id(get(Self::KEY_PRODUCT)?).ok_or_else(|| {
            ValidationError::invalid_format(Self::KEY_PRODUCT, "unknown product tag")
        })?;
        let date = get(Self::KEY_SLOT_DATE)?
            .parse()
            .map_err(|_| ValidationError::invalid_format(Self::KEY_SLOT_DATE, "expected YYYY-MM-DD"))?;
        let start = chrono::NaiveTime::parse_from_str(get(Self::KEY_SLOT_TIME)?, "%H:%M")
            .map_err(|_| ValidationError::invalid_format(Self::KEY_SLOT_TIME, "expected HH:MM"))?;

        Ok(Self {
            buyer_id,
            mentor_id,
            product,
            slot: Slot::new(date, start),
        })
    }
}

/// Request to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionRequest {
    /// Amount to charge, in the smallest currency unit.
    pub amount_cents: i64,

    /// ISO currency code (lowercase).
    pub currency: String,

    /// Product name shown on the hosted payment page.
    pub product_name: String,

    /// Booking details to carry through the gateway.
    pub metadata: CheckoutMetadata,

    /// URL to redirect after successful payment.
    pub success_url: String,

    /// URL to redirect after abandoned payment.
    pub cancel_url: String,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Handle for a newly created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionHandle {
    /// Gateway's session reference.
    pub reference: String,

    /// URL for the buyer to complete payment.
    pub redirect_url: String,

    /// When the session expires (Unix timestamp).
    pub expires_at: i64,
}

/// Payment status of a checkout session as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSessionStatus {
    /// Session is open; payment not yet made.
    Pending,

    /// Payment completed.
    Completed,

    /// Session expired without payment.
    Expired,
}

/// Full state of a checkout session fetched from the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutSessionState {
    pub reference: String,
    pub status: CheckoutSessionStatus,
    pub amount_cents: i64,
    pub metadata: BTreeMap<String, String>,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Timeout, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    /// Create a rate limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::RateLimited, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Call exceeded the configured timeout.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimited,

    /// Resource not found.
    NotFound,

    /// Request was malformed or rejected.
    InvalidRequest,

    /// Provider-side error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError
                | GatewayErrorCode::Timeout
                | GatewayErrorCode::RateLimited
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::Timeout => "timeout",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::RateLimited => "rate_limited",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    // Trait object safety test
    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    fn test_metadata() -> CheckoutMetadata {
        CheckoutMetadata {
            buyer_id: BuyerId::new("buyer-1").unwrap(),
            mentor_id: MentorId::new(),
            product: SessionLength::QuickChat,
            slot: Slot::new(
                "2026-09-14".parse().unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn metadata_round_trips_through_map() {
        let metadata = test_metadata();
        let map = metadata.to_map();
        let parsed = CheckoutMetadata::from_map(&map).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn metadata_map_uses_stable_keys() {
        let map = test_metadata().to_map();
        assert!(map.contains_key("buyer_id"));
        assert!(map.contains_key("mentor_id"));
        assert!(map.contains_key("product_id"));
        assert!(map.contains_key("slot_date"));
        assert!(map.contains_key("slot_time"));
        assert_eq!(map.get("product_id").unwrap(), "quick-chat");
        assert_eq!(map.get("slot_time").unwrap(), "10:00");
    }

    #[test]
    fn metadata_rejects_missing_keys() {
        let mut map = test_metadata().to_map();
        map.remove("mentor_id");
        assert!(CheckoutMetadata::from_map(&map).is_err());
    }

    #[test]
    fn metadata_rejects_unknown_product() {
        let mut map = test_metadata().to_map();
        map.insert("product_id".to_string(), "mega-session".to_string());
        assert!(CheckoutMetadata::from_map(&map).is_err());
    }

    #[test]
    fn metadata_rejects_malformed_slot() {
        let mut map = test_metadata().to_map();
        map.insert("slot_date".to_string(), "tomorrow".to_string());
        assert!(CheckoutMetadata::from_map(&map).is_err());
    }

    #[test]
    fn gateway_error_retryable() {
        assert!(GatewayErrorCode::NetworkError.is_retryable());
        assert!(GatewayErrorCode::Timeout.is_retryable());
        assert!(GatewayErrorCode::RateLimited.is_retryable());

        assert!(!GatewayErrorCode::InvalidRequest.is_retryable());
        assert!(!GatewayErrorCode::NotFound.is_retryable());
        assert!(!GatewayErrorCode::AuthenticationError.is_retryable());
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::timeout("request exceeded 10s");
        assert!(err.to_string().contains("timeout"));
        assert!(err.to_string().contains("request exceeded 10s"));
        assert!(err.retryable);
    }
}
