//! Stripe payment gateway adapters.

mod checkout_gateway;
mod mock_gateway;
mod types;

pub use checkout_gateway::{StripeCheckoutGateway, StripeGatewayConfig};
pub use mock_gateway::MockPaymentGateway;
pub use types::StripeCheckoutSessionObject;
