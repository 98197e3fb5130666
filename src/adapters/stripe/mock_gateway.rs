//! Mock payment gateway for testing.
//!
//! Configurable in-memory implementation of `PaymentGateway`. Supports
//! transient-failure injection for retry tests, idempotency-key
//! deduplication matching Stripe's behavior, and session status
//! manipulation to simulate checkout outcomes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSessionHandle, CheckoutSessionState, CheckoutSessionStatus,
    CreateCheckoutSessionRequest, GatewayError, PaymentGateway,
};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.fail_next_creates(2);
///
/// let handle = mock.create_checkout_session(request).await?;
/// mock.complete_session(&handle.reference);
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Stored sessions by reference.
    sessions: HashMap<String, CheckoutSessionState>,

    /// Idempotency key to session reference mapping.
    key_to_reference: HashMap<String, String>,

    /// Number of creates that will fail with a retryable error.
    failing_creates: u32,

    /// Monotonic counter for session references.
    next_session: u64,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` session creations fail with a retryable
    /// timeout error. Failed attempts do not create sessions.
    pub fn fail_next_creates(&self, n: u32) {
        self.inner.lock().unwrap().failing_creates = n;
    }

    /// Marks a session as completed and paid.
    pub fn complete_session(&self, reference: &str) {
        if let Some(session) = self.inner.lock().unwrap().sessions.get_mut(reference) {
            session.status = CheckoutSessionStatus::Completed;
        }
    }

    /// Marks a session as expired.
    pub fn expire_session(&self, reference: &str) {
        if let Some(session) = self.inner.lock().unwrap().sessions.get_mut(reference) {
            session.status = CheckoutSessionStatus::Expired;
        }
    }

    /// Number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.inner.lock().unwrap().sessions.len()
    }
}

impl Clone for MockPaymentGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSessionHandle, GatewayError> {
        let mut state = self.inner.lock().unwrap();

        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return Err(GatewayError::timeout("mock gateway timed out"));
        }

        // Stripe replays the original response for a reused idempotency key.
        if let Some(key) = &request.idempotency_key {
            if let Some(reference) = state.key_to_reference.get(key).cloned() {
                return Ok(CheckoutSessionHandle {
                    reference: reference.clone(),
                    redirect_url: format!("https://checkout.stripe.com/c/pay/{}", reference),
                    expires_at: chrono::Utc::now().timestamp() + 24 * 60 * 60,
                });
            }
        }

        state.next_session += 1;
        let reference = format!("cs_mock_{}", state.next_session);

        state.sessions.insert(
            reference.clone(),
            CheckoutSessionState {
                reference: reference.clone(),
                status: CheckoutSessionStatus::Pending,
                amount_cents: request.amount_cents,
                metadata: request.metadata.to_map(),
            },
        );

        if let Some(key) = &request.idempotency_key {
            state.key_to_reference.insert(key.clone(), reference.clone());
        }

        Ok(CheckoutSessionHandle {
            reference: reference.clone(),
            redirect_url: format!("https://checkout.stripe.com/c/pay/{}", reference),
            expires_at: chrono::Utc::now().timestamp() + 24 * 60 * 60,
        })
    }

    async fn get_checkout_session(
        &self,
        reference: &str,
    ) -> Result<Option<CheckoutSessionState>, GatewayError> {
        Ok(self.inner.lock().unwrap().sessions.get(reference).cloned())
    }
}
