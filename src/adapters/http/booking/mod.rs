//! HTTP adapter for booking endpoints.
//!
//! Exposes the booking domain via REST API:
//! - `GET /api/mentors/:mentor_id/availability` - Open slots in a window
//! - `GET /api/mentors/:mentor_id/products/:product_id` - A priced product
//! - `POST /api/bookings/checkout` - Start a paid booking
//! - `GET /api/bookings/confirm` - Reconcile a checkout session
//! - `GET /api/bookings` - List the authenticated buyer's bookings

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedBuyer, BookingApiError, BookingAppState};
pub use routes::{api_router, booking_routes, mentor_routes};
