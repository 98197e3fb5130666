//! Stripe API response types.
//!
//! Deserialization targets for the subset of the Checkout Sessions API
//! this service calls. Fields Stripe may omit are optional.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::ports::CheckoutSessionStatus;

/// A Stripe Checkout Session object as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSessionObject {
    /// Session ID (cs_...).
    pub id: String,

    /// Hosted checkout page URL. Absent once the session completes.
    pub url: Option<String>,

    /// Session lifecycle status: "open", "complete", or "expired".
    pub status: Option<String>,

    /// Payment status: "paid", "unpaid", or "no_payment_required".
    pub payment_status: Option<String>,

    /// Total amount in the smallest currency unit.
    pub amount_total: Option<i64>,

    /// Unix timestamp at which the session expires.
    pub expires_at: Option<i64>,

    /// Metadata attached at session creation.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl StripeCheckoutSessionObject {
    /// Maps Stripe's status pair onto the port's session status.
    ///
    /// A session only counts as completed when Stripe reports both
    /// `status = complete` and `payment_status = paid`. A completed
    /// session whose payment is still processing stays pending.
    pub fn checkout_status(&self) -> CheckoutSessionStatus {
        match (self.status.as_deref(), self.payment_status.as_deref()) {
            (Some("expired"), _) => CheckoutSessionStatus::Expired,
            (Some("complete"), Some("paid")) => CheckoutSessionStatus::Completed,
            _ => CheckoutSessionStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_session() {
        let json = r#"{
            "id": "cs_test_123",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_123",
            "status": "open",
            "payment_status": "unpaid",
            "amount_total": 7500,
            "expires_at": 1767225600,
            "metadata": {"buyer_id": "buyer-1"}
        }"#;

        let session: StripeCheckoutSessionObject = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "cs_test_123");
        assert_eq!(session.amount_total, Some(7500));
        assert_eq!(session.checkout_status(), CheckoutSessionStatus::Pending);
        assert_eq!(session.metadata.get("buyer_id").map(String::as_str), Some("buyer-1"));
    }

    #[test]
    fn complete_and_paid_is_completed() {
        let json = r#"{
            "id": "cs_test_123",
            "status": "complete",
            "payment_status": "paid"
        }"#;

        let session: StripeCheckoutSessionObject = serde_json::from_str(json).unwrap();
        assert_eq!(session.checkout_status(), CheckoutSessionStatus::Completed);
    }

    #[test]
    fn complete_but_unpaid_stays_pending() {
        let json = r#"{
            "id": "cs_test_123",
            "status": "complete",
            "payment_status": "unpaid"
        }"#;

        let session: StripeCheckoutSessionObject = serde_json::from_str(json).unwrap();
        assert_eq!(session.checkout_status(), CheckoutSessionStatus::Pending);
    }

    #[test]
    fn expired_session_is_expired() {
        let json = r#"{
            "id": "cs_test_123",
            "status": "expired",
            "payment_status": "unpaid"
        }"#;

        let session: StripeCheckoutSessionObject = serde_json::from_str(json).unwrap();
        assert_eq!(session.checkout_status(), CheckoutSessionStatus::Expired);
    }

    #[test]
    fn missing_metadata_defaults_to_empty() {
        let json = r#"{"id": "cs_test_123", "status": "open"}"#;

        let session: StripeCheckoutSessionObject = serde_json::from_str(json).unwrap();
        assert!(session.metadata.is_empty());
    }
}
