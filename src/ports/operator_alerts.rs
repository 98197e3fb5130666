//! Operator alerts port.
//!
//! Escalation channel for conditions that must reach a human without
//! failing the buyer's request. Today the only alert is a scheduling
//! conflict discovered after payment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{BookingId, CheckoutRef, DomainError, MentorId};

/// A paid booking that lost its slot race and needs human resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingConflictAlert {
    /// The flagged booking that was written anyway.
    pub booking_id: BookingId,

    pub mentor_id: MentorId,
    pub starts_at: DateTime<Utc>,
    pub checkout_ref: CheckoutRef,

    /// The booking currently holding the slot, if it could be identified.
    pub holder_booking_id: Option<BookingId>,
}

/// Port for escalating conditions to operators.
#[async_trait]
pub trait OperatorAlerts: Send + Sync {
    /// Notify operators about a scheduling conflict discovered after
    /// payment. Failures here must not fail the reconciliation.
    async fn scheduling_conflict(&self, alert: SchedulingConflictAlert) -> Result<(), DomainError>;
}
