//! Axum router configuration for booking endpoints.
//!
//! This module defines the route structure for the booking API and
//! wires it to the corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm_booking, create_checkout, get_availability, get_product, list_bookings,
    BookingAppState,
};

/// Create the mentor catalog router.
///
/// # Routes
/// - `GET /:mentor_id/availability?from=&to=` - Open slots in a window
/// - `GET /:mentor_id/products/:product_id` - A priced session product
pub fn mentor_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/:mentor_id/availability", get(get_availability))
        .route("/:mentor_id/products/:product_id", get(get_product))
}

/// Create the booking router.
///
/// # Routes
/// - `GET /` - List the authenticated buyer's bookings
/// - `POST /checkout` - Start a paid booking
/// - `GET /confirm?session=` - Reconcile a checkout session
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/checkout", post(create_checkout))
        .route("/confirm", get(confirm_booking))
}

/// Create the complete API router.
///
/// Suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::booking::{api_router, BookingAppState};
///
/// let app_state = BookingAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api", api_router())
///     .with_state(app_state);
/// ```
pub fn api_router() -> Router<BookingAppState> {
    Router::new()
        .nest("/mentors", mentor_routes())
        .nest("/bookings", booking_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::adapters::alerts::TracingOperatorAlerts;
    use crate::adapters::memory::{InMemoryBookingStore, InMemoryMentorDirectory};
    use crate::adapters::stripe::MockPaymentGateway;
    use crate::domain::scheduling::AvailabilityRules;

    fn test_state() -> BookingAppState {
        BookingAppState {
            directory: Arc::new(InMemoryMentorDirectory::new()),
            store: Arc::new(InMemoryBookingStore::new()),
            gateway: Arc::new(MockPaymentGateway::new()),
            alerts: Arc::new(TracingOperatorAlerts::new()),
            rules: AvailabilityRules::default(),
            currency: "usd".to_string(),
            gateway_max_attempts: 3,
            gateway_retry_delay: Duration::from_millis(250),
        }
    }

    #[test]
    fn mentor_routes_creates_router() {
        let router = mentor_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn booking_routes_creates_router() {
        let router = booking_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn api_router_creates_combined_router() {
        let router = api_router();
        let _: Router<()> = router.with_state(test_state());
    }

    // Note: request-level coverage of these routes lives in
    // tests/booking_http.rs; full flows in tests/booking_flow.rs.
}
