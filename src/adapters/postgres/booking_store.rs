//! PostgreSQL implementation of BookingStore.
//!
//! The database carries the two invariants the reconciler depends on:
//! a unique index on `checkout_ref` makes creation idempotent, and a
//! partial unique index on `(mentor_id, starts_at)` over slot-holding
//! rows prevents double-booking under concurrent writes.

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::catalog::SessionLength;
use crate::domain::foundation::{
    BookingId, BuyerId, CheckoutRef, DomainError, ErrorCode, MentorId, Timestamp,
};
use crate::ports::{BookingStore, BookingWrite};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Name of the partial unique index guarding slot-holding rows.
const SLOT_CONSTRAINT: &str = "bookings_mentor_slot_key";

/// Name of the unique constraint on the checkout reference.
const CHECKOUT_REF_CONSTRAINT: &str = "bookings_checkout_ref_key";

/// PostgreSQL implementation of the BookingStore port.
pub struct PostgresBookingStore {
    pool: PgPool,
}

impl PostgresBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    buyer_id: String,
    mentor_id: Uuid,
    product_id: String,
    starts_at: DateTime<Utc>,
    duration_minutes: i32,
    status: String,
    needs_review: bool,
    meeting_link: Option<String>,
    checkout_ref: String,
    amount_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let product = parse_product(&row.product_id)?;
        let status = parse_status(&row.status)?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            buyer_id: BuyerId::new(row.buyer_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid buyer_id: {}", e))
            })?,
            mentor_id: MentorId::from_uuid(row.mentor_id),
            product,
            starts_at: Timestamp::from_datetime(row.starts_at),
            duration_minutes: row.duration_minutes,
            status,
            needs_review: row.needs_review,
            meeting_link: row.meeting_link,
            checkout_ref: CheckoutRef::new(row.checkout_ref).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid checkout_ref: {}", e),
                )
            })?,
            amount_cents: row.amount_cents,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_product(s: &str) -> Result<SessionLength, DomainError> {
    SessionLength::from_product_id(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid product_id value: {}", s),
        )
    })
}

fn parse_status(s: &str) -> Result<BookingStatus, DomainError> {
    BookingStatus::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )
    })
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, buyer_id, mentor_id, product_id, starts_at, duration_minutes,
           status, needs_review, meeting_link, checkout_ref, amount_cents,
           created_at, updated_at
    FROM bookings
"#;

#[async_trait]
impl BookingStore for PostgresBookingStore {
    async fn create_if_absent(&self, booking: &Booking) -> Result<BookingWrite, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (
                id, buyer_id, mentor_id, product_id, starts_at, duration_minutes,
                status, needs_review, meeting_link, checkout_ref, amount_cents,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (checkout_ref) DO NOTHING
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.buyer_id.as_str())
        .bind(booking.mentor_id.as_uuid())
        .bind(booking.product.product_id())
        .bind(booking.starts_at.as_datetime())
        .bind(booking.duration_minutes)
        .bind(booking.status.as_str())
        .bind(booking.needs_review)
        .bind(&booking.meeting_link)
        .bind(booking.checkout_ref.as_str())
        .bind(booking.amount_cents)
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(SLOT_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::SlotUnavailable,
                        "Slot is already held by another booking",
                    );
                }
                if db_err.constraint() == Some(CHECKOUT_REF_CONSTRAINT) {
                    // ON CONFLICT covers this, kept for older schema versions.
                    return DomainError::new(
                        ErrorCode::DuplicateBooking,
                        "Booking already exists for this checkout reference",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to create booking: {}", e),
            )
        })?;

        if result.rows_affected() > 0 {
            return Ok(BookingWrite::Created(booking.clone()));
        }

        // The reference was already reconciled, return the stored row.
        match self.find_by_checkout_ref(&booking.checkout_ref).await? {
            Some(existing) => Ok(BookingWrite::AlreadyExists(existing)),
            None => Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Booking insert conflicted but no existing row was found",
            )),
        }
    }

    async fn find_by_checkout_ref(
        &self,
        reference: &CheckoutRef,
    ) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{} WHERE checkout_ref = $1", SELECT_COLUMNS))
                .bind(reference.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find booking: {}", e),
                    )
                })?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find booking: {}", e),
                    )
                })?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_for_mentor(
        &self,
        mentor_id: &MentorId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} WHERE mentor_id = $1 AND starts_at >= $2 AND starts_at < $3 ORDER BY starts_at ASC",
            SELECT_COLUMNS
        ))
        .bind(mentor_id.as_uuid())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list bookings: {}", e),
            )
        })?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_for_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{} WHERE buyer_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list bookings: {}", e),
            )
        })?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_slot_holder(
        &self,
        mentor_id: &MentorId,
        starts_at: DateTime<Utc>,
    ) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"{} WHERE mentor_id = $1
                 AND starts_at = $2
                 AND status <> 'cancelled'
                 AND needs_review = false"#,
            SELECT_COLUMNS
        ))
        .bind(mentor_id.as_uuid())
        .bind(starts_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find slot holder: {}", e),
            )
        })?;

        row.map(Booking::try_from).transpose()
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                needs_review = $3,
                meeting_link = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.needs_review)
        .bind(&booking.meeting_link)
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(SLOT_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::SlotUnavailable,
                        "Slot is already held by another booking",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update booking: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                "Booking not found",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_product_works_for_all_values() {
        assert_eq!(parse_product("quick-chat").unwrap(), SessionLength::QuickChat);
        assert_eq!(
            parse_product("full-session").unwrap(),
            SessionLength::FullSession
        );
        assert_eq!(parse_product("deep-dive").unwrap(), SessionLength::DeepDive);
    }

    #[test]
    fn parse_product_rejects_invalid_values() {
        assert!(parse_product("invalid").is_err());
        assert!(parse_product("").is_err());
    }

    #[test]
    fn parse_status_works_for_all_values() {
        assert_eq!(parse_status("pending").unwrap(), BookingStatus::Pending);
        assert_eq!(parse_status("confirmed").unwrap(), BookingStatus::Confirmed);
        assert_eq!(parse_status("completed").unwrap(), BookingStatus::Completed);
        assert_eq!(parse_status("cancelled").unwrap(), BookingStatus::Cancelled);
    }

    #[test]
    fn parse_status_rejects_invalid_values() {
        assert!(parse_status("invalid").is_err());
        assert!(parse_status("").is_err());
    }

    #[test]
    fn roundtrip_product_conversion() {
        for product in SessionLength::ALL {
            let s = product.product_id();
            assert_eq!(parse_product(s).unwrap(), product);
        }
    }

    #[test]
    fn roundtrip_status_conversion() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let s = status.as_str();
            assert_eq!(parse_status(s).unwrap(), status);
        }
    }
}
