//! Operator alert adapters.

mod tracing_alerts;

pub use tracing_alerts::TracingOperatorAlerts;
