//! HTTP DTOs (Data Transfer Objects) for booking endpoints.
//!
//! These types define the JSON request/response structure for the
//! booking API. They serve as the boundary between HTTP and the
//! application layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::handlers::checkout::{InitiateCheckoutResult, ReconcilePaymentResult};
use crate::domain::booking::Booking;
use crate::domain::catalog::Product;
use crate::domain::scheduling::Slot;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityParams {
    /// First day of the window (inclusive), YYYY-MM-DD.
    pub from: NaiveDate,
    /// Last day of the window (inclusive), YYYY-MM-DD.
    pub to: NaiveDate,
}

/// Request to initiate checkout for a selected slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Mentor to book.
    pub mentor_id: Uuid,
    /// Product tag: quick-chat, full-session, or deep-dive.
    pub product_id: String,
    /// Slot date, YYYY-MM-DD.
    pub slot_date: NaiveDate,
    /// Slot start time, HH:MM.
    pub slot_time: String,
    /// URL to redirect after successful payment.
    pub success_url: String,
    /// URL to redirect after cancelled checkout.
    pub cancel_url: String,
}

/// Query parameters for the confirmation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmParams {
    /// Gateway reference of the checkout session to reconcile.
    pub session: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A single open slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    /// Slot date, YYYY-MM-DD.
    pub date: String,
    /// Slot start time, HH:MM.
    pub start: String,
    /// Full start instant (ISO 8601, UTC).
    pub starts_at: String,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            date: slot.date.format("%Y-%m-%d").to_string(),
            start: slot.start.format("%H:%M").to_string(),
            starts_at: slot.starts_at().to_rfc3339(),
        }
    }
}

/// Response for the availability endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub mentor_id: String,
    pub slots: Vec<SlotResponse>,
}

/// A purchasable session product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub mentor_id: String,
    /// Product tag: quick-chat, full-session, or deep-dive.
    pub product_id: String,
    pub display_name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            mentor_id: product.mentor_id.to_string(),
            product_id: product.product_id().to_string(),
            display_name: product.display_name(),
            duration_minutes: product.duration_minutes(),
            price_cents: product.price_cents,
        }
    }
}

/// Response for a created checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    /// Gateway reference; pass back to the confirmation endpoint.
    pub reference: String,
    /// Hosted payment page for the buyer.
    pub redirect_url: String,
    pub amount_cents: i64,
    pub phase: String,
}

impl From<InitiateCheckoutResult> for CheckoutResponse {
    fn from(result: InitiateCheckoutResult) -> Self {
        Self {
            reference: result.reference,
            redirect_url: result.redirect_url,
            amount_cents: result.amount_cents,
            phase: result.phase.as_str().to_string(),
        }
    }
}

/// A booking as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub buyer_id: String,
    pub mentor_id: String,
    pub product_id: String,
    /// Start instant (ISO 8601, UTC).
    pub starts_at: String,
    pub duration_minutes: i32,
    pub status: String,
    pub needs_review: bool,
    pub meeting_link: Option<String>,
    pub amount_cents: i64,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            buyer_id: booking.buyer_id.to_string(),
            mentor_id: booking.mentor_id.to_string(),
            product_id: booking.product.product_id().to_string(),
            starts_at: booking.starts_at.as_datetime().to_rfc3339(),
            duration_minutes: booking.duration_minutes,
            status: booking.status.as_str().to_string(),
            needs_review: booking.needs_review,
            meeting_link: booking.meeting_link,
            amount_cents: booking.amount_cents,
            created_at: booking.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the confirmation endpoint.
///
/// When the gateway has not marked the session paid yet, `booking` is
/// null and `phase` stays at `reconciling` so the client can poll.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResponse {
    pub phase: String,
    pub newly_created: bool,
    pub conflict_flagged: bool,
    pub booking: Option<BookingResponse>,
}

impl ConfirmResponse {
    pub fn pending() -> Self {
        Self {
            phase: "reconciling".to_string(),
            newly_created: false,
            conflict_flagged: false,
            booking: None,
        }
    }
}

impl From<ReconcilePaymentResult> for ConfirmResponse {
    fn from(result: ReconcilePaymentResult) -> Self {
        Self {
            phase: "confirmed".to_string(),
            newly_created: result.newly_created,
            conflict_flagged: result.conflict_flagged,
            booking: Some(BookingResponse::from(result.booking)),
        }
    }
}

/// Response listing a buyer's bookings.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
}

/// Standard error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
