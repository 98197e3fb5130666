//! Booking module - the booking aggregate and its lifecycle.

mod aggregate;
mod errors;
mod status;

pub use aggregate::Booking;
pub use errors::BookingError;
pub use status::{BookingStatus, CheckoutPhase};
