//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `alerts` - Operator alert sinks
//! - `http` - REST API surface
//! - `memory` - In-memory adapters for tests and local development
//! - `postgres` - PostgreSQL persistence
//! - `stripe` - Stripe payment gateway (and its test mock)

pub mod alerts;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
