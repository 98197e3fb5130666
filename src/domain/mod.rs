//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `mentor` - Mentor profiles and rate cards as seen by booking
//! - `catalog` - Session products derived from rate cards
//! - `scheduling` - Slots and the pure availability computation
//! - `booking` - Booking aggregate, lifecycle, and error taxonomy

pub mod booking;
pub mod catalog;
pub mod foundation;
pub mod mentor;
pub mod scheduling;
