//! MentorLink Core server entry point.
//!
//! Loads configuration from the environment, connects to PostgreSQL,
//! wires the production adapters into the booking API, and serves it.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mentorlink::adapters::alerts::TracingOperatorAlerts;
use mentorlink::adapters::http::booking::{api_router, BookingAppState};
use mentorlink::adapters::postgres::{PostgresBookingStore, PostgresMentorDirectory};
use mentorlink::adapters::stripe::{StripeCheckoutGateway, StripeGatewayConfig};
use mentorlink::config::AppConfig;
use mentorlink::domain::scheduling::AvailabilityRules;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    tracing::info!(
        environment = config.server.environment.as_str(),
        stripe_test_mode = config.payment.is_test_mode(),
        "starting mentorlink"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let gateway_config = StripeGatewayConfig::new(
        config.payment.stripe_api_key.clone(),
        config.payment.gateway_timeout(),
    );

    let state = BookingAppState {
        directory: Arc::new(PostgresMentorDirectory::new(pool.clone())),
        store: Arc::new(PostgresBookingStore::new(pool)),
        gateway: Arc::new(StripeCheckoutGateway::new(gateway_config)),
        alerts: Arc::new(TracingOperatorAlerts::new()),
        rules: AvailabilityRules::default(),
        currency: config.payment.currency.clone(),
        gateway_max_attempts: config.payment.max_attempts,
        gateway_retry_delay: config.payment.retry_delay(),
    };

    let cors = build_cors_layer(&config.server.cors_origins_list());

    let app = axum::Router::new()
        .nest("/api", api_router())
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "mentorlink listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// An empty origin list means permissive CORS (development default).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
