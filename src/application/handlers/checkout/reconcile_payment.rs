//! ReconcilePaymentHandler - Command handler turning a paid checkout
//! session into a confirmed booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::{CheckoutRef, ErrorCode, Timestamp};
use crate::ports::{
    BookingStore, BookingWrite, CheckoutMetadata, CheckoutSessionState, CheckoutSessionStatus,
    OperatorAlerts, PaymentGateway, SchedulingConflictAlert,
};

/// Command to reconcile a checkout session into a booking.
#[derive(Debug, Clone)]
pub struct ReconcilePaymentCommand {
    /// Gateway reference of the checkout session.
    pub reference: String,
}

/// Result of reconciliation.
#[derive(Debug, Clone)]
pub struct ReconcilePaymentResult {
    pub booking: Booking,

    /// False when the reference had already been reconciled; the stored
    /// booking is returned unchanged.
    pub newly_created: bool,

    /// True when the booking was written flagged because its slot was
    /// claimed between payment and reconciliation.
    pub conflict_flagged: bool,
}

/// Handler verifying payment and writing the booking.
///
/// The ordering is fixed: verify payment with the gateway first, then
/// write idempotently on the checkout reference, then flag (never drop)
/// scheduling conflicts. The buyer has paid; losing a slot race must
/// produce a flagged booking and an operator alert, not an error.
pub struct ReconcilePaymentHandler {
    store: Arc<dyn BookingStore>,
    gateway: Arc<dyn PaymentGateway>,
    alerts: Arc<dyn OperatorAlerts>,
}

impl ReconcilePaymentHandler {
    pub fn new(
        store: Arc<dyn BookingStore>,
        gateway: Arc<dyn PaymentGateway>,
        alerts: Arc<dyn OperatorAlerts>,
    ) -> Self {
        Self {
            store,
            gateway,
            alerts,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcilePaymentCommand,
    ) -> Result<ReconcilePaymentResult, BookingError> {
        // 1. Verify payment against the gateway. Nothing is written until
        //    the gateway says the session is completed.
        let session = self.fetch_completed_session(&cmd.reference).await?;

        let metadata = CheckoutMetadata::from_map(&session.metadata)
            .map_err(|e| BookingError::invalid_metadata(e.to_string()))?;

        let checkout_ref = CheckoutRef::new(cmd.reference.clone())
            .map_err(|e| BookingError::validation("reference", e.to_string()))?;

        // 2. Idempotency: a booking for this reference is returned as-is.
        if let Some(existing) = self.store.find_by_checkout_ref(&checkout_ref).await? {
            tracing::debug!(reference = %checkout_ref, booking_id = %existing.id, "duplicate reconciliation");
            let conflict_flagged = existing.needs_review;
            return Ok(ReconcilePaymentResult {
                booking: existing,
                newly_created: false,
                conflict_flagged,
            });
        }

        // 3. Build the confirmed booking, flagging it if the slot was
        //    claimed while the buyer was paying.
        let starts_at = metadata.slot.starts_at();
        let holder = self
            .store
            .find_slot_holder(&metadata.mentor_id, starts_at)
            .await?;

        let mut booking = Booking::new(
            metadata.buyer_id,
            metadata.mentor_id,
            metadata.product,
            Timestamp::from_datetime(starts_at),
            checkout_ref,
            session.amount_cents,
        );
        booking.confirm()?;

        if holder.is_some() {
            booking.flag_for_review();
        }

        // 4. Write, handling both races: another reconcile of the same
        //    reference, and another booking claiming the slot first.
        let (booking, newly_created) = self
            .write_booking(booking, holder.as_ref().map(|h| h.id))
            .await?;

        let conflict_flagged = booking.needs_review;
        if newly_created && conflict_flagged {
            self.emit_conflict_alert(&booking, holder.map(|h| h.id)).await;
        }

        if newly_created {
            tracing::info!(
                booking_id = %booking.id,
                mentor_id = %booking.mentor_id,
                needs_review = booking.needs_review,
                "booking reconciled"
            );
        }

        Ok(ReconcilePaymentResult {
            booking,
            newly_created,
            conflict_flagged,
        })
    }

    async fn fetch_completed_session(
        &self,
        reference: &str,
    ) -> Result<CheckoutSessionState, BookingError> {
        let session = self
            .gateway
            .get_checkout_session(reference)
            .await
            .map_err(|e| {
                if e.retryable {
                    BookingError::gateway_unreachable(e.message)
                } else {
                    BookingError::gateway_rejected(e.message)
                }
            })?
            .ok_or_else(|| BookingError::session_not_found(reference))?;

        if session.status != CheckoutSessionStatus::Completed {
            return Err(BookingError::payment_not_completed(reference));
        }
        Ok(session)
    }

    /// Writes the booking. A `SlotUnavailable` rejection on an unflagged
    /// booking means the slot race was lost at the constraint itself; the
    /// booking is flagged and written anyway.
    async fn write_booking(
        &self,
        mut booking: Booking,
        holder_id: Option<crate::domain::foundation::BookingId>,
    ) -> Result<(Booking, bool), BookingError> {
        loop {
            match self.store.create_if_absent(&booking).await {
                Ok(BookingWrite::Created(b)) => return Ok((b, true)),
                Ok(BookingWrite::AlreadyExists(b)) => return Ok((b, false)),
                Err(e) if e.code == ErrorCode::SlotUnavailable && !booking.needs_review => {
                    tracing::warn!(
                        checkout_ref = %booking.checkout_ref,
                        holder_booking_id = ?holder_id,
                        "slot claimed during reconciliation, flagging booking"
                    );
                    booking.flag_for_review();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Alert failures are logged, never surfaced: the buyer's booking is
    /// already written.
    async fn emit_conflict_alert(
        &self,
        booking: &Booking,
        holder_booking_id: Option<crate::domain::foundation::BookingId>,
    ) {
        let alert = SchedulingConflictAlert {
            booking_id: booking.id,
            mentor_id: booking.mentor_id,
            starts_at: *booking.starts_at.as_datetime(),
            checkout_ref: booking.checkout_ref.clone(),
            holder_booking_id,
        };
        if let Err(e) = self.alerts.scheduling_conflict(alert).await {
            tracing::error!(
                booking_id = %booking.id,
                error = %e,
                "failed to emit scheduling conflict alert"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBookingStore;
    use crate::adapters::stripe::MockPaymentGateway;
    use crate::domain::booking::BookingStatus;
    use crate::domain::catalog::SessionLength;
    use crate::domain::foundation::{BuyerId, DomainError, MentorId};
    use crate::domain::scheduling::Slot;
    use crate::ports::{CheckoutMetadata, CreateCheckoutSessionRequest};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime, Utc};
    use std::sync::Mutex;

    /// Records alerts for assertions.
    struct RecordingAlerts {
        alerts: Mutex<Vec<SchedulingConflictAlert>>,
    }

    impl RecordingAlerts {
        fn new() -> Self {
            Self {
                alerts: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<SchedulingConflictAlert> {
            self.alerts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OperatorAlerts for RecordingAlerts {
        async fn scheduling_conflict(
            &self,
            alert: SchedulingConflictAlert,
        ) -> Result<(), DomainError> {
            self.alerts.lock().unwrap().push(alert);
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<InMemoryBookingStore>,
        gateway: Arc<MockPaymentGateway>,
        alerts: Arc<RecordingAlerts>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Arc::new(InMemoryBookingStore::new()),
                gateway: Arc::new(MockPaymentGateway::new()),
                alerts: Arc::new(RecordingAlerts::new()),
            }
        }

        fn handler(&self) -> ReconcilePaymentHandler {
            ReconcilePaymentHandler::new(
                self.store.clone(),
                self.gateway.clone(),
                self.alerts.clone(),
            )
        }

        /// Creates a gateway session for the metadata and returns its reference.
        async fn session_for(&self, metadata: CheckoutMetadata, amount_cents: i64) -> String {
            let handle = self
                .gateway
                .create_checkout_session(CreateCheckoutSessionRequest {
                    amount_cents,
                    currency: "usd".to_string(),
                    product_name: "Full Session (60 min)".to_string(),
                    metadata,
                    success_url: "https://app.example.com/confirm".to_string(),
                    cancel_url: "https://app.example.com/cancel".to_string(),
                    idempotency_key: None,
                })
                .await
                .unwrap();
            handle.reference
        }
    }

    fn test_metadata(mentor_id: MentorId, slot: Slot) -> CheckoutMetadata {
        CheckoutMetadata {
            buyer_id: BuyerId::new("buyer-1").unwrap(),
            mentor_id,
            product: SessionLength::FullSession,
            slot,
        }
    }

    fn future_slot() -> Slot {
        let day = Utc::now().date_naive() + Duration::days(10);
        Slot::new(day, NaiveTime::from_hms_opt(10, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn completed_session_yields_confirmed_booking() {
        let fx = Fixture::new();
        let mentor_id = MentorId::new();
        let slot = future_slot();
        let reference = fx.session_for(test_metadata(mentor_id, slot), 5000).await;
        fx.gateway.complete_session(&reference);

        let result = fx
            .handler()
            .handle(ReconcilePaymentCommand {
                reference: reference.clone(),
            })
            .await
            .unwrap();

        assert!(result.newly_created);
        assert!(!result.conflict_flagged);
        assert_eq!(result.booking.status, BookingStatus::Confirmed);
        assert_eq!(result.booking.amount_cents, 5000);
        assert_eq!(result.booking.checkout_ref.as_str(), reference);
        assert_eq!(*result.booking.starts_at.as_datetime(), slot.starts_at());
        assert_eq!(fx.store.count(), 1);
    }

    #[tokio::test]
    async fn pending_session_writes_nothing() {
        let fx = Fixture::new();
        let reference = fx
            .session_for(test_metadata(MentorId::new(), future_slot()), 5000)
            .await;

        let result = fx
            .handler()
            .handle(ReconcilePaymentCommand { reference })
            .await;

        assert!(matches!(
            result,
            Err(BookingError::PaymentNotCompleted { .. })
        ));
        assert_eq!(fx.store.count(), 0);
    }

    #[tokio::test]
    async fn expired_session_writes_nothing() {
        let fx = Fixture::new();
        let reference = fx
            .session_for(test_metadata(MentorId::new(), future_slot()), 5000)
            .await;
        fx.gateway.expire_session(&reference);

        let result = fx
            .handler()
            .handle(ReconcilePaymentCommand { reference })
            .await;

        assert!(matches!(
            result,
            Err(BookingError::PaymentNotCompleted { .. })
        ));
        assert_eq!(fx.store.count(), 0);
    }

    #[tokio::test]
    async fn unknown_reference_is_session_not_found() {
        let fx = Fixture::new();

        let result = fx
            .handler()
            .handle(ReconcilePaymentCommand {
                reference: "cs_missing".to_string(),
            })
            .await;

        assert!(matches!(result, Err(BookingError::SessionNotFound { .. })));
    }

    #[tokio::test]
    async fn duplicate_reconciliation_returns_same_booking_without_second_write() {
        let fx = Fixture::new();
        let reference = fx
            .session_for(test_metadata(MentorId::new(), future_slot()), 5000)
            .await;
        fx.gateway.complete_session(&reference);

        let first = fx
            .handler()
            .handle(ReconcilePaymentCommand {
                reference: reference.clone(),
            })
            .await
            .unwrap();
        let second = fx
            .handler()
            .handle(ReconcilePaymentCommand { reference })
            .await
            .unwrap();

        assert!(first.newly_created);
        assert!(!second.newly_created);
        assert_eq!(first.booking.id, second.booking.id);
        assert_eq!(fx.store.count(), 1);
    }

    #[tokio::test]
    async fn lost_slot_race_flags_booking_and_alerts_operators() {
        let fx = Fixture::new();
        let mentor_id = MentorId::new();
        let slot = future_slot();

        // Another buyer claimed the slot while ours was paying.
        let mut holder = Booking::new(
            BuyerId::new("faster-buyer").unwrap(),
            mentor_id,
            SessionLength::FullSession,
            Timestamp::from_datetime(slot.starts_at()),
            CheckoutRef::new("cs_faster").unwrap(),
            5000,
        );
        holder.confirm().unwrap();
        fx.store.create_if_absent(&holder).await.unwrap();

        let reference = fx.session_for(test_metadata(mentor_id, slot), 5000).await;
        fx.gateway.complete_session(&reference);

        let result = fx
            .handler()
            .handle(ReconcilePaymentCommand { reference })
            .await
            .unwrap();

        // The paid booking is written flagged, never dropped.
        assert!(result.newly_created);
        assert!(result.conflict_flagged);
        assert!(result.booking.needs_review);
        assert_eq!(result.booking.status, BookingStatus::Confirmed);
        assert_eq!(fx.store.count(), 2);

        let alerts = fx.alerts.recorded();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].booking_id, result.booking.id);
        assert_eq!(alerts[0].holder_booking_id, Some(holder.id));
    }

    #[tokio::test]
    async fn flagged_booking_leaves_holder_in_place() {
        let fx = Fixture::new();
        let mentor_id = MentorId::new();
        let slot = future_slot();

        let mut holder = Booking::new(
            BuyerId::new("faster-buyer").unwrap(),
            mentor_id,
            SessionLength::FullSession,
            Timestamp::from_datetime(slot.starts_at()),
            CheckoutRef::new("cs_faster").unwrap(),
            5000,
        );
        holder.confirm().unwrap();
        fx.store.create_if_absent(&holder).await.unwrap();

        let reference = fx.session_for(test_metadata(mentor_id, slot), 5000).await;
        fx.gateway.complete_session(&reference);
        fx.handler()
            .handle(ReconcilePaymentCommand { reference })
            .await
            .unwrap();

        let current_holder = fx
            .store
            .find_slot_holder(&mentor_id, slot.starts_at())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current_holder.id, holder.id);
    }
}
