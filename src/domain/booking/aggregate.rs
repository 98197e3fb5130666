//! Booking aggregate entity.
//!
//! A Booking records a paid advisory session between a buyer and a
//! mentor at a specific time.
//!
//! # Design Decisions
//!
//! - **Money in cents**: All monetary values stored as i64 cents (not floats)
//! - **One booking per checkout reference**: Unique constraint at database level
//! - **One slot holder per mentor+time**: Partial unique index over
//!   non-cancelled, unflagged bookings
//! - **Conflicts are flagged, never dropped**: A paid booking that lost its
//!   slot race is written with `needs_review` set

use serde::{Deserialize, Serialize};

use crate::domain::catalog::SessionLength;
use crate::domain::foundation::{
    BookingId, BuyerId, CheckoutRef, DomainError, ErrorCode, MentorId, Timestamp,
};

use super::BookingStatus;

/// Booking aggregate - a scheduled, paid advisory session.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `checkout_ref` is unique (one booking per payment)
/// - Status transitions follow state machine rules
/// - At most one non-cancelled, unflagged booking per (mentor, starts_at)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for this booking.
    pub id: BookingId,

    /// Buyer who paid for the session.
    pub buyer_id: BuyerId,

    /// Mentor delivering the session.
    pub mentor_id: MentorId,

    /// Which session product was purchased.
    pub product: SessionLength,

    /// When the session starts (UTC).
    pub starts_at: Timestamp,

    /// Session duration in minutes, frozen at purchase time.
    pub duration_minutes: i32,

    /// Current status in the booking lifecycle.
    pub status: BookingStatus,

    /// Set when the slot was claimed by another booking between payment
    /// and reconciliation. Flagged bookings do not hold their slot and
    /// await operator resolution.
    pub needs_review: bool,

    /// Video call link, set once the session is provisioned.
    pub meeting_link: Option<String>,

    /// Gateway checkout session this booking was reconciled from.
    pub checkout_ref: CheckoutRef,

    /// Amount paid, in the smallest currency unit.
    pub amount_cents: i64,

    /// When the booking was created.
    pub created_at: Timestamp,

    /// When the booking was last updated.
    pub updated_at: Timestamp,
}

impl Booking {
    /// Create a new pending booking from a verified payment.
    pub fn new(
        buyer_id: BuyerId,
        mentor_id: MentorId,
        product: SessionLength,
        starts_at: Timestamp,
        checkout_ref: CheckoutRef,
        amount_cents: i64,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: BookingId::new(),
            buyer_id,
            mentor_id,
            product,
            starts_at,
            duration_minutes: product.duration_minutes(),
            status: BookingStatus::Pending,
            needs_review: false,
            meeting_link: None,
            checkout_ref,
            amount_cents,
            created_at: now,
            updated_at: now,
        }
    }

    /// Confirm this booking after payment verification.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        self.transition_to(BookingStatus::Confirmed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Mark the session as having taken place.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.transition_to(BookingStatus::Completed)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Cancel this booking, releasing its slot.
    ///
    /// # Errors
    ///
    /// Returns error if transition from current status is not allowed.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition_to(BookingStatus::Cancelled)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Flag this booking for operator review after a scheduling conflict.
    pub fn flag_for_review(&mut self) {
        self.needs_review = true;
        self.updated_at = Timestamp::now();
    }

    /// Attach the provisioned meeting link.
    pub fn set_meeting_link(&mut self, link: impl Into<String>) {
        self.meeting_link = Some(link.into());
        self.updated_at = Timestamp::now();
    }

    /// Returns true if this booking has not been cancelled.
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Returns true if this booking holds its (mentor, starts_at) slot.
    ///
    /// Cancelled and flagged bookings do not block the slot for others.
    pub fn holds_slot(&self) -> bool {
        self.is_active() && !self.needs_review
    }

    /// Transition to a new status using the state machine.
    fn transition_to(&mut self, target: BookingStatus) -> Result<(), DomainError> {
        use crate::domain::foundation::StateMachine;

        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition booking from {:?} to {:?}",
                    self.status, target
                ),
            )
        })?;
        Ok(())
    }
}
