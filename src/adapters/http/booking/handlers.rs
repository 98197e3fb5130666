//! HTTP handlers for booking endpoints.
//!
//! These handlers connect Axum routes to application layer
//! command/query handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveTime;
use uuid::Uuid;

use crate::application::handlers::availability::{
    ResolveAvailabilityHandler, ResolveAvailabilityQuery,
};
use crate::application::handlers::catalog::{ResolveProductHandler, ResolveProductQuery};
use crate::application::handlers::checkout::{
    InitiateCheckoutCommand, InitiateCheckoutHandler, ReconcilePaymentCommand,
    ReconcilePaymentHandler,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{BuyerId, MentorId};
use crate::domain::scheduling::{AvailabilityRules, Slot};
use crate::ports::{BookingStore, MentorDirectory, OperatorAlerts, PaymentGateway};

use super::dto::{
    AvailabilityParams, AvailabilityResponse, BookingListResponse, BookingResponse,
    CheckoutResponse, ConfirmParams, ConfirmResponse, CreateCheckoutRequest, ErrorResponse,
    SlotResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped
/// dependencies for efficient sharing across handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub directory: Arc<dyn MentorDirectory>,
    pub store: Arc<dyn BookingStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub alerts: Arc<dyn OperatorAlerts>,
    pub rules: AvailabilityRules,
    pub currency: String,
    pub gateway_max_attempts: u32,
    pub gateway_retry_delay: Duration,
}

impl BookingAppState {
    /// Create handlers on demand from the shared state.
    pub fn resolve_availability_handler(&self) -> ResolveAvailabilityHandler {
        ResolveAvailabilityHandler::new(
            self.directory.clone(),
            self.store.clone(),
            self.rules.clone(),
        )
    }

    pub fn resolve_product_handler(&self) -> ResolveProductHandler {
        ResolveProductHandler::new(self.directory.clone())
    }

    pub fn initiate_checkout_handler(&self) -> InitiateCheckoutHandler {
        InitiateCheckoutHandler::new(
            self.directory.clone(),
            self.store.clone(),
            self.gateway.clone(),
            self.rules.clone(),
            self.currency.clone(),
            self.gateway_max_attempts,
            self.gateway_retry_delay,
        )
    }

    pub fn reconcile_payment_handler(&self) -> ReconcilePaymentHandler {
        ReconcilePaymentHandler::new(
            self.store.clone(),
            self.gateway.clone(),
            self.alerts.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Buyer Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated buyer context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth
/// middleware. For now, uses a header-based extraction for
/// development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedBuyer {
    pub buyer_id: BuyerId,
}

/// Rejection type for AuthenticatedBuyer extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedBuyer
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate a JWT from the
            // Authorization header. For development, we accept X-Buyer-Id.
            let buyer_id = parts
                .headers
                .get("X-Buyer-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| BuyerId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedBuyer { buyer_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/mentors/:mentor_id/availability - Open slots in a window
pub async fn get_availability(
    State(state): State<BookingAppState>,
    Path(mentor_id): Path<Uuid>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.resolve_availability_handler();
    let mentor_id = MentorId::from_uuid(mentor_id);
    let query = ResolveAvailabilityQuery {
        mentor_id,
        window_start: params.from,
        window_end: params.to,
    };

    let slots = handler.handle(query).await?;

    let response = AvailabilityResponse {
        mentor_id: mentor_id.to_string(),
        slots: slots.into_iter().map(SlotResponse::from).collect(),
    };

    Ok(Json(response))
}

/// GET /api/mentors/:mentor_id/products/:product_id - A priced product
pub async fn get_product(
    State(state): State<BookingAppState>,
    Path((mentor_id, product_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.resolve_product_handler();
    let query = ResolveProductQuery {
        mentor_id: MentorId::from_uuid(mentor_id),
        product_id,
    };

    let product = handler.handle(query).await?;

    Ok(Json(super::dto::ProductResponse::from(product)))
}

/// GET /api/bookings - List the authenticated buyer's bookings
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    buyer: AuthenticatedBuyer,
) -> Result<impl IntoResponse, BookingApiError> {
    let bookings = state
        .store
        .list_for_buyer(&buyer.buyer_id)
        .await
        .map_err(BookingError::from)?;

    let response = BookingListResponse {
        bookings: bookings.into_iter().map(BookingResponse::from).collect(),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/confirm endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings/checkout - Start a paid booking
pub async fn create_checkout(
    State(state): State<BookingAppState>,
    buyer: AuthenticatedBuyer,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let start = NaiveTime::parse_from_str(&request.slot_time, "%H:%M").map_err(|_| {
        BookingError::validation(
            "slot_time",
            format!("'{}' is not a valid HH:MM time", request.slot_time),
        )
    })?;

    let handler = state.initiate_checkout_handler();
    let cmd = InitiateCheckoutCommand {
        buyer_id: buyer.buyer_id,
        mentor_id: MentorId::from_uuid(request.mentor_id),
        product_id: request.product_id,
        slot: Slot::new(request.slot_date, start),
        success_url: request.success_url,
        cancel_url: request.cancel_url,
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(result))))
}

/// GET /api/bookings/confirm - Reconcile a checkout session
///
/// Called when the buyer lands on the success URL. Safe to retry: a
/// session that was already reconciled returns the stored booking, and
/// a session the gateway has not marked paid yet returns 202 so the
/// client can poll.
pub async fn confirm_booking(
    State(state): State<BookingAppState>,
    Query(params): Query<ConfirmParams>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.reconcile_payment_handler();
    let cmd = ReconcilePaymentCommand {
        reference: params.session,
    };

    match handler.handle(cmd).await {
        Ok(result) => Ok((StatusCode::OK, Json(ConfirmResponse::from(result)))),
        Err(BookingError::PaymentNotCompleted { .. }) => {
            Ok((StatusCode::ACCEPTED, Json(ConfirmResponse::pending())))
        }
        Err(e) => Err(e.into()),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for BookingApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(BookingError::from(err))
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            BookingError::MentorNotFound(_) => (StatusCode::NOT_FOUND, "MENTOR_NOT_FOUND"),
            BookingError::ProductUnavailable { .. } => {
                (StatusCode::NOT_FOUND, "PRODUCT_UNAVAILABLE")
            }
            BookingError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            BookingError::InvalidWindow { .. } => (StatusCode::BAD_REQUEST, "INVALID_WINDOW"),
            BookingError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            BookingError::InvalidMetadata(_) => (StatusCode::BAD_REQUEST, "INVALID_METADATA"),
            BookingError::SlotNoLongerAvailable { .. } => {
                (StatusCode::CONFLICT, "SLOT_UNAVAILABLE")
            }
            BookingError::PaymentNotCompleted { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_NOT_COMPLETED")
            }
            BookingError::GatewayUnreachable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "GATEWAY_UNREACHABLE")
            }
            BookingError::GatewayRejected(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            BookingError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
