//! In-memory booking store.
//!
//! Enforces the same uniqueness rules as the PostgreSQL adapter: one
//! booking per checkout reference, one slot-holding booking per
//! (mentor, starts_at). Used in tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use crate::domain::booking::Booking;
use crate::domain::foundation::{
    BookingId, BuyerId, CheckoutRef, DomainError, ErrorCode, MentorId,
};
use crate::ports::{BookingStore, BookingWrite};

/// Booking store backed by a mutex-guarded vector.
pub struct InMemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored bookings (test helper).
    pub fn count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create_if_absent(&self, booking: &Booking) -> Result<BookingWrite, DomainError> {
        let mut bookings = self.bookings.lock().unwrap();

        if let Some(existing) = bookings
            .iter()
            .find(|b| b.checkout_ref == booking.checkout_ref)
        {
            return Ok(BookingWrite::AlreadyExists(existing.clone()));
        }

        if booking.holds_slot() {
            let clash = bookings.iter().any(|b| {
                b.holds_slot()
                    && b.mentor_id == booking.mentor_id
                    && b.starts_at == booking.starts_at
            });
            if clash {
                return Err(DomainError::new(
                    ErrorCode::SlotUnavailable,
                    format!(
                        "Slot at {} for mentor {} is already held",
                        booking.starts_at.as_datetime(),
                        booking.mentor_id
                    ),
                ));
            }
        }

        bookings.push(booking.clone());
        Ok(BookingWrite::Created(booking.clone()))
    }

    async fn find_by_checkout_ref(
        &self,
        reference: &CheckoutRef,
    ) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.checkout_ref == reference)
            .cloned())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.id == id)
            .cloned())
    }

    async fn list_for_mentor(
        &self,
        mentor_id: &MentorId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, DomainError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| {
                &b.mentor_id == mentor_id
                    && *b.starts_at.as_datetime() >= from
                    && *b.starts_at.as_datetime() < to
            })
            .cloned()
            .collect();
        matches.sort_by_key(|b| b.starts_at);
        Ok(matches)
    }

    async fn list_for_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<Booking>, DomainError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| &b.buyer_id == buyer_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn find_slot_holder(
        &self,
        mentor_id: &MentorId,
        starts_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, DomainError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| {
                b.holds_slot()
                    && &b.mentor_id == mentor_id
                    && *b.starts_at.as_datetime() == starts_at
            })
            .cloned())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(stored) => {
                *stored = booking.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking not found: {}", booking.id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::SessionLength;
    use crate::domain::foundation::Timestamp;

    fn booking(mentor_id: MentorId, reference: &str, starts_at: Timestamp) -> Booking {
        let mut b = Booking::new(
            BuyerId::new("buyer-1").unwrap(),
            mentor_id,
            SessionLength::QuickChat,
            starts_at,
            CheckoutRef::new(reference).unwrap(),
            2500,
        );
        b.confirm().unwrap();
        b
    }

    #[tokio::test]
    async fn create_is_idempotent_on_checkout_ref() {
        let store = InMemoryBookingStore::new();
        let b = booking(MentorId::new(), "cs_1", Timestamp::now().add_days(5));

        let first = store.create_if_absent(&b).await.unwrap();
        assert!(first.is_created());

        let second = store.create_if_absent(&b).await.unwrap();
        assert!(!second.is_created());
        assert_eq!(second.into_booking().id, b.id);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn slot_clash_is_rejected() {
        let store = InMemoryBookingStore::new();
        let mentor_id = MentorId::new();
        let starts_at = Timestamp::now().add_days(5);

        store
            .create_if_absent(&booking(mentor_id, "cs_1", starts_at))
            .await
            .unwrap();

        let rival = booking(mentor_id, "cs_2", starts_at);
        let result = store.create_if_absent(&rival).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::SlotUnavailable));
    }

    #[tokio::test]
    async fn flagged_booking_bypasses_slot_constraint() {
        let store = InMemoryBookingStore::new();
        let mentor_id = MentorId::new();
        let starts_at = Timestamp::now().add_days(5);

        store
            .create_if_absent(&booking(mentor_id, "cs_1", starts_at))
            .await
            .unwrap();

        let mut flagged = booking(mentor_id, "cs_2", starts_at);
        flagged.flag_for_review();
        let result = store.create_if_absent(&flagged).await.unwrap();
        assert!(result.is_created());
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn cancelled_booking_releases_slot() {
        let store = InMemoryBookingStore::new();
        let mentor_id = MentorId::new();
        let starts_at = Timestamp::now().add_days(5);

        let mut original = booking(mentor_id, "cs_1", starts_at);
        store.create_if_absent(&original).await.unwrap();
        original.cancel().unwrap();
        store.update(&original).await.unwrap();

        let replacement = booking(mentor_id, "cs_2", starts_at);
        assert!(store.create_if_absent(&replacement).await.unwrap().is_created());
    }

    #[tokio::test]
    async fn list_for_mentor_respects_window() {
        let store = InMemoryBookingStore::new();
        let mentor_id = MentorId::new();
        let inside = Timestamp::now().add_days(3);
        let outside = Timestamp::now().add_days(30);

        store
            .create_if_absent(&booking(mentor_id, "cs_in", inside))
            .await
            .unwrap();
        store
            .create_if_absent(&booking(mentor_id, "cs_out", outside))
            .await
            .unwrap();

        let from = *Timestamp::now().as_datetime();
        let to = *Timestamp::now().add_days(7).as_datetime();
        let listed = store.list_for_mentor(&mentor_id, from, to).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].checkout_ref.as_str(), "cs_in");
    }

    #[tokio::test]
    async fn update_unknown_booking_fails() {
        let store = InMemoryBookingStore::new();
        let b = booking(MentorId::new(), "cs_1", Timestamp::now().add_days(5));
        let result = store.update(&b).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::BookingNotFound));
    }
}
