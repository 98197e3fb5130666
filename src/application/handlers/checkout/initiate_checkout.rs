//! InitiateCheckoutHandler - Command handler for starting a paid booking.

use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::booking::{BookingError, CheckoutPhase};
use crate::domain::catalog::Product;
use crate::domain::foundation::{BuyerId, MentorId};
use crate::domain::scheduling::{slot_is_open, AvailabilityRules, Slot};
use crate::ports::{
    BookingStore, CheckoutMetadata, CreateCheckoutSessionRequest, MentorDirectory, PaymentGateway,
};

/// Command to initiate checkout for a selected slot.
#[derive(Debug, Clone)]
pub struct InitiateCheckoutCommand {
    pub buyer_id: BuyerId,
    pub mentor_id: MentorId,
    /// Product tag: quick-chat, full-session, or deep-dive.
    pub product_id: String,
    pub slot: Slot,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of successful checkout initiation.
#[derive(Debug, Clone)]
pub struct InitiateCheckoutResult {
    /// Gateway reference for the created session.
    pub reference: String,

    /// Hosted payment page for the buyer.
    pub redirect_url: String,

    pub amount_cents: i64,

    /// Always `AwaitingPayment` on success.
    pub phase: CheckoutPhase,
}

/// Handler for starting a paid booking.
///
/// Re-validates the slot and resolves the product at initiation time,
/// then asks the gateway for a hosted checkout session. Writes nothing
/// locally: until payment is verified, the gateway session is the only
/// record of the attempt.
///
/// The gateway call is retried with backoff under a stable idempotency
/// key, so a retried request can never mint a second session.
pub struct InitiateCheckoutHandler {
    directory: Arc<dyn MentorDirectory>,
    store: Arc<dyn BookingStore>,
    gateway: Arc<dyn PaymentGateway>,
    rules: AvailabilityRules,
    currency: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl InitiateCheckoutHandler {
    pub fn new(
        directory: Arc<dyn MentorDirectory>,
        store: Arc<dyn BookingStore>,
        gateway: Arc<dyn PaymentGateway>,
        rules: AvailabilityRules,
        currency: String,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            directory,
            store,
            gateway,
            rules,
            currency,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitiateCheckoutCommand,
    ) -> Result<InitiateCheckoutResult, BookingError> {
        // 1. Resolve the product, which also validates the mentor.
        let product = self.resolve_product(&cmd).await?;

        // 2. Re-validate the slot against current bookings. The buyer may
        //    have been looking at a stale availability view.
        self.ensure_slot_open(&cmd).await?;

        // 3. Create the gateway session, bounded and retried.
        let metadata = CheckoutMetadata {
            buyer_id: cmd.buyer_id.clone(),
            mentor_id: cmd.mentor_id,
            product: product.length,
            slot: cmd.slot,
        };
        let request = CreateCheckoutSessionRequest {
            amount_cents: product.price_cents,
            currency: self.currency.clone(),
            product_name: product.display_name(),
            metadata,
            success_url: cmd.success_url.clone(),
            cancel_url: cmd.cancel_url.clone(),
            idempotency_key: Some(Self::idempotency_key(&cmd)),
        };
        let session = self.create_session_with_retry(request).await?;

        tracing::info!(
            reference = %session.reference,
            mentor_id = %cmd.mentor_id,
            amount_cents = product.price_cents,
            "checkout session created"
        );

        Ok(InitiateCheckoutResult {
            reference: session.reference,
            redirect_url: session.redirect_url,
            amount_cents: product.price_cents,
            phase: CheckoutPhase::AwaitingPayment,
        })
    }

    /// Stable per-(buyer, mentor, product, slot) key: retries of the
    /// same selection reuse the same gateway session, while changing
    /// any part of the selection starts a fresh one.
    fn idempotency_key(cmd: &InitiateCheckoutCommand) -> String {
        format!(
            "checkout-{}-{}-{}-{}",
            cmd.buyer_id,
            cmd.mentor_id,
            cmd.product_id,
            cmd.slot.starts_at().format("%Y%m%dT%H%M")
        )
    }

    async fn resolve_product(&self, cmd: &InitiateCheckoutCommand) -> Result<Product, BookingError> {
        let length =
            crate::domain::catalog::SessionLength::from_product_id(&cmd.product_id).ok_or_else(
                || {
                    BookingError::validation(
                        "product_id",
                        format!("unknown product tag '{}'", cmd.product_id),
                    )
                },
            )?;

        let mentor = self
            .directory
            .find_mentor(&cmd.mentor_id)
            .await?
            .filter(|m| m.visible)
            .ok_or(BookingError::MentorNotFound(cmd.mentor_id))?;

        mentor.product(length).ok_or(BookingError::ProductUnavailable {
            mentor_id: cmd.mentor_id,
            product: length,
        })
    }

    async fn ensure_slot_open(&self, cmd: &InitiateCheckoutCommand) -> Result<(), BookingError> {
        let day_start = Utc.from_utc_datetime(&cmd.slot.date.and_time(chrono::NaiveTime::MIN));
        let next_day = cmd
            .slot
            .date
            .succ_opt()
            .ok_or_else(|| BookingError::infrastructure("slot date out of range"))?;
        let day_end = Utc.from_utc_datetime(&next_day.and_time(chrono::NaiveTime::MIN));

        let bookings = self
            .store
            .list_for_mentor(&cmd.mentor_id, day_start, day_end)
            .await?;
        let taken: HashSet<_> = bookings
            .iter()
            .filter(|b| b.holds_slot())
            .map(|b| *b.starts_at.as_datetime())
            .collect();

        if !slot_is_open(&self.rules, &cmd.slot, Utc::now(), &taken) {
            return Err(BookingError::slot_no_longer_available(
                cmd.mentor_id,
                cmd.slot,
            ));
        }
        Ok(())
    }

    async fn create_session_with_retry(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<crate::ports::CheckoutSessionHandle, BookingError> {
        let mut attempt = 1u32;
        loop {
            match self.gateway.create_checkout_session(request.clone()).await {
                Ok(session) => return Ok(session),
                Err(e) if e.retryable && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "gateway session creation failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) if e.retryable => {
                    return Err(BookingError::gateway_unreachable(e.message));
                }
                Err(e) => return Err(BookingError::gateway_rejected(e.message)),
            }
        }
    }
}
