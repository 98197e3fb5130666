//! Integration tests for the booking HTTP surface.
//!
//! These tests drive the assembled router with real requests:
//! 1. The confirmation endpoint returns the booking once the session
//!    is paid and 202 while it is not
//! 2. Buyer identity is extracted from the X-Buyer-Id header and
//!    missing identity is rejected with 401

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, NaiveTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use mentorlink::adapters::alerts::TracingOperatorAlerts;
use mentorlink::adapters::http::booking::{api_router, BookingAppState};
use mentorlink::adapters::memory::{InMemoryBookingStore, InMemoryMentorDirectory};
use mentorlink::adapters::stripe::MockPaymentGateway;
use mentorlink::domain::foundation::{BuyerId, MentorId};
use mentorlink::domain::scheduling::{AvailabilityRules, Slot};
use mentorlink::ports::{CheckoutMetadata, CreateCheckoutSessionRequest, PaymentGateway};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApi {
    gateway: Arc<MockPaymentGateway>,
    router: Router,
}

impl TestApi {
    fn new() -> Self {
        let gateway = Arc::new(MockPaymentGateway::new());
        let state = BookingAppState {
            directory: Arc::new(InMemoryMentorDirectory::new()),
            store: Arc::new(InMemoryBookingStore::new()),
            gateway: gateway.clone(),
            alerts: Arc::new(TracingOperatorAlerts::new()),
            rules: AvailabilityRules::default(),
            currency: "usd".to_string(),
            gateway_max_attempts: 3,
            gateway_retry_delay: Duration::from_millis(1),
        };
        Self {
            gateway,
            router: api_router().with_state(state),
        }
    }

    /// Creates a gateway session for a paid-for slot and returns its
    /// reference.
    async fn seed_session(&self, buyer: &str) -> String {
        let day = Utc::now().date_naive() + ChronoDuration::days(10);
        let metadata = CheckoutMetadata {
            buyer_id: BuyerId::new(buyer).unwrap(),
            mentor_id: MentorId::new(),
            product: mentorlink::domain::catalog::SessionLength::FullSession,
            slot: Slot::new(day, NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
        };
        self.gateway
            .create_checkout_session(CreateCheckoutSessionRequest {
                amount_cents: 5000,
                currency: "usd".to_string(),
                product_name: "Full Session (60 min)".to_string(),
                metadata,
                success_url: "https://app.example.com/confirm".to_string(),
                cancel_url: "https://app.example.com/cancel".to_string(),
                idempotency_key: None,
            })
            .await
            .unwrap()
            .reference
    }

    async fn get(&self, uri: &str, buyer_header: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(buyer) = buyer_header {
            request = request.header("X-Buyer-Id", buyer);
        }
        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn confirm_returns_booking_once_session_is_paid() {
    let api = TestApi::new();
    let reference = api.seed_session("buyer-1").await;
    api.gateway.complete_session(&reference);

    let (status, body) = api
        .get(&format!("/bookings/confirm?session={reference}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "confirmed");
    assert_eq!(body["newly_created"], true);
    assert_eq!(body["conflict_flagged"], false);
    assert_eq!(body["booking"]["status"], "confirmed");
    assert_eq!(body["booking"]["amount_cents"], 5000);
}

#[tokio::test]
async fn confirm_reports_reconciling_while_unpaid() {
    let api = TestApi::new();
    let reference = api.seed_session("buyer-1").await;

    let (status, body) = api
        .get(&format!("/bookings/confirm?session={reference}"), None)
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["phase"], "reconciling");
    assert!(body["booking"].is_null());
}

#[tokio::test]
async fn confirm_rejects_unknown_session() {
    let api = TestApi::new();

    let (status, body) = api.get("/bookings/confirm?session=cs_missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn booking_list_requires_buyer_identity() {
    let api = TestApi::new();

    let (status, body) = api.get("/bookings", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTHENTICATION_REQUIRED");
}

#[tokio::test]
async fn booking_list_scopes_to_the_header_buyer() {
    let api = TestApi::new();
    let reference = api.seed_session("buyer-1").await;
    api.gateway.complete_session(&reference);
    api.get(&format!("/bookings/confirm?session={reference}"), None)
        .await;

    let (status, body) = api.get("/bookings", Some("buyer-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    let (status, body) = api.get("/bookings", Some("someone-else")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["bookings"].as_array().unwrap().is_empty());
}
