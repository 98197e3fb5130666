//! Booking store port (persistence).
//!
//! Defines the contract for persisting and retrieving Booking aggregates.
//!
//! # Design
//!
//! - **Idempotent creation**: `create_if_absent` is keyed on the booking's
//!   checkout reference; replays return the stored booking instead of
//!   writing twice
//! - **Constraint-backed uniqueness**: implementations must enforce one
//!   booking per checkout reference and one slot-holding booking per
//!   (mentor, starts_at) at the storage level, not just in application code

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, BuyerId, CheckoutRef, DomainError, MentorId};

/// Outcome of an idempotent booking write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingWrite {
    /// The booking was written.
    Created(Booking),

    /// A booking for this checkout reference already existed; the stored
    /// one is returned unchanged.
    AlreadyExists(Booking),
}

impl BookingWrite {
    /// Returns the booking regardless of whether it was just written.
    pub fn into_booking(self) -> Booking {
        match self {
            BookingWrite::Created(b) | BookingWrite::AlreadyExists(b) => b,
        }
    }

    /// Returns true if the write created a new row.
    pub fn is_created(&self) -> bool {
        matches!(self, BookingWrite::Created(_))
    }
}

/// Repository port for Booking aggregate persistence.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Create the booking unless one already exists for its checkout
    /// reference.
    ///
    /// # Errors
    ///
    /// - `SlotUnavailable` if a different slot-holding booking exists for
    ///   the same (mentor, starts_at) and this booking would hold its slot
    /// - `DatabaseError` on persistence failure
    async fn create_if_absent(&self, booking: &Booking) -> Result<BookingWrite, DomainError>;

    /// Find a booking by its originating checkout reference.
    ///
    /// Returns `None` if not found.
    async fn find_by_checkout_ref(
        &self,
        reference: &CheckoutRef,
    ) -> Result<Option<Booking>, DomainError>;

    /// Find a booking by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// List a mentor's bookings starting within [from, to), most recent
    /// window queries first feed the availability resolver.
    async fn list_for_mentor(
        &self,
        mentor_id: &MentorId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, DomainError>;

    /// List all bookings made by a buyer, newest first.
    async fn list_for_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<Booking>, DomainError>;

    /// Find the booking currently holding a (mentor, starts_at) slot.
    ///
    /// Returns `None` if the slot is free. Cancelled and flagged bookings
    /// never hold a slot.
    async fn find_slot_holder(
        &self,
        mentor_id: &MentorId,
        starts_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, DomainError>;

    /// Update an existing booking.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;
}
