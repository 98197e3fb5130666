//! Booking lifecycle statuses.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Status of a booking in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created but payment not yet verified.
    Pending,

    /// Paid and scheduled.
    Confirmed,

    /// Session took place.
    Completed,

    /// Booking was cancelled; its slot is released.
    Cancelled,
}

impl BookingStatus {
    /// Returns the stable database string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a database string back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl StateMachine for BookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use BookingStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase of a buyer's checkout journey.
///
/// The journey is linear: it either reaches `Confirmed` or ends in
/// `Failed`. Only the checkout reference is persisted; the phase is
/// reconstructed from gateway and store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutPhase {
    /// Buyer is choosing mentor, product, and slot.
    Selecting,

    /// Slot revalidated, gateway session being created.
    Initiating,

    /// Buyer redirected to the hosted payment page.
    AwaitingPayment,

    /// Payment outcome being verified against the gateway.
    Reconciling,

    /// Booking written and confirmed.
    Confirmed,

    /// Journey ended without a booking.
    Failed,
}

impl CheckoutPhase {
    /// Returns the stable wire string for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Selecting => "selecting",
            CheckoutPhase::Initiating => "initiating",
            CheckoutPhase::AwaitingPayment => "awaiting-payment",
            CheckoutPhase::Reconciling => "reconciling",
            CheckoutPhase::Confirmed => "confirmed",
            CheckoutPhase::Failed => "failed",
        }
    }
}

impl StateMachine for CheckoutPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CheckoutPhase::*;
        matches!(
            (self, target),
            (Selecting, Initiating)
                | (Initiating, AwaitingPayment)
                | (Initiating, Failed)
                | (AwaitingPayment, Reconciling)
                | (AwaitingPayment, Failed)
                | (Reconciling, Confirmed)
                | (Reconciling, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CheckoutPhase::*;
        match self {
            Selecting => vec![Initiating],
            Initiating => vec![AwaitingPayment, Failed],
            AwaitingPayment => vec![Reconciling, Failed],
            Reconciling => vec![Confirmed, Failed],
            Confirmed => vec![],
            Failed => vec![],
        }
    }
}

impl std::fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
