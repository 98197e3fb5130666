//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MentorDirectory` - Read-side lookup of mentor profiles
//! - `BookingStore` - Persistence for Booking aggregates
//! - `PaymentGateway` - Hosted checkout sessions (create/fetch)
//! - `OperatorAlerts` - Escalation channel for human-resolved conditions

mod booking_store;
mod mentor_directory;
mod operator_alerts;
mod payment_gateway;

pub use booking_store::{BookingStore, BookingWrite};
pub use mentor_directory::MentorDirectory;
pub use operator_alerts::{OperatorAlerts, SchedulingConflictAlert};
pub use payment_gateway::{
    CheckoutMetadata, CheckoutSessionHandle, CheckoutSessionState, CheckoutSessionStatus,
    CreateCheckoutSessionRequest, GatewayError, GatewayErrorCode, PaymentGateway,
};
