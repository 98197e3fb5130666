//! Booking-specific error types.
//!
//! Errors for availability, catalog, checkout, and reconciliation
//! operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MentorNotFound | 404 |
//! | ProductUnavailable | 404 |
//! | SessionNotFound | 404 |
//! | InvalidWindow | 400 |
//! | ValidationFailed | 400 |
//! | InvalidMetadata | 400 |
//! | SlotNoLongerAvailable | 409 |
//! | PaymentNotCompleted | 402 |
//! | GatewayUnreachable | 503 |
//! | GatewayRejected | 502 |
//! | Infrastructure | 500 |

use chrono::NaiveDate;

use crate::domain::catalog::SessionLength;
use crate::domain::foundation::{DomainError, ErrorCode, MentorId};
use crate::domain::scheduling::Slot;

/// Booking-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Mentor does not exist or is not visible.
    MentorNotFound(MentorId),

    /// The mentor does not price this session length.
    ProductUnavailable {
        mentor_id: MentorId,
        product: SessionLength,
    },

    /// Availability window has start after end.
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// Slot was taken between selection and checkout initiation.
    SlotNoLongerAvailable { mentor_id: MentorId, slot: Slot },

    /// Checkout session exists but payment is not completed.
    PaymentNotCompleted { reference: String },

    /// No checkout session exists for this reference.
    SessionNotFound { reference: String },

    /// Gateway could not be reached or timed out; worth retrying.
    GatewayUnreachable(String),

    /// Gateway returned a terminal error for the request.
    GatewayRejected(String),

    /// Gateway session metadata could not be parsed into a booking.
    InvalidMetadata(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl BookingError {
    // Constructor functions for cleaner error creation

    pub fn mentor_not_found(id: MentorId) -> Self {
        BookingError::MentorNotFound(id)
    }

    pub fn product_unavailable(mentor_id: MentorId, product: SessionLength) -> Self {
        BookingError::ProductUnavailable { mentor_id, product }
    }

    pub fn invalid_window(start: NaiveDate, end: NaiveDate) -> Self {
        BookingError::InvalidWindow { start, end }
    }

    pub fn slot_no_longer_available(mentor_id: MentorId, slot: Slot) -> Self {
        BookingError::SlotNoLongerAvailable { mentor_id, slot }
    }

    pub fn payment_not_completed(reference: impl Into<String>) -> Self {
        BookingError::PaymentNotCompleted {
            reference: reference.into(),
        }
    }

    pub fn session_not_found(reference: impl Into<String>) -> Self {
        BookingError::SessionNotFound {
            reference: reference.into(),
        }
    }

    pub fn gateway_unreachable(message: impl Into<String>) -> Self {
        BookingError::GatewayUnreachable(message.into())
    }

    pub fn gateway_rejected(message: impl Into<String>) -> Self {
        BookingError::GatewayRejected(message.into())
    }

    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        BookingError::InvalidMetadata(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::MentorNotFound(_) => ErrorCode::MentorNotFound,
            BookingError::ProductUnavailable { .. } => ErrorCode::ProductUnavailable,
            BookingError::InvalidWindow { .. } => ErrorCode::ValidationFailed,
            BookingError::SlotNoLongerAvailable { .. } => ErrorCode::SlotUnavailable,
            BookingError::PaymentNotCompleted { .. } => ErrorCode::PaymentNotCompleted,
            BookingError::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            BookingError::GatewayUnreachable(_) => ErrorCode::GatewayUnreachable,
            BookingError::GatewayRejected(_) => ErrorCode::GatewayError,
            BookingError::InvalidMetadata(_) => ErrorCode::InvalidFormat,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            BookingError::MentorNotFound(id) => format!("Mentor not found: {}", id),
            BookingError::ProductUnavailable { mentor_id, product } => {
                format!("Mentor {} does not offer {}", mentor_id, product)
            }
            BookingError::InvalidWindow { start, end } => {
                format!("Window start {} is after end {}", start, end)
            }
            BookingError::SlotNoLongerAvailable { mentor_id, slot } => {
                format!("Slot {} for mentor {} is no longer available", slot, mentor_id)
            }
            BookingError::PaymentNotCompleted { reference } => {
                format!("Payment for checkout session {} is not completed", reference)
            }
            BookingError::SessionNotFound { reference } => {
                format!("No checkout session found for reference {}", reference)
            }
            BookingError::GatewayUnreachable(msg) => {
                format!("Payment gateway unreachable: {}", msg)
            }
            BookingError::GatewayRejected(msg) => {
                format!("Payment gateway rejected the request: {}", msg)
            }
            BookingError::InvalidMetadata(msg) => {
                format!("Checkout session metadata is invalid: {}", msg)
            }
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::Infrastructure(_) | BookingError::GatewayUnreachable(_)
        )
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                BookingError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => BookingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<BookingError> for DomainError {
    fn from(err: BookingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
