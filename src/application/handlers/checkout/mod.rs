//! Checkout command handlers.

mod initiate_checkout;
mod reconcile_payment;

pub use initiate_checkout::{
    InitiateCheckoutCommand, InitiateCheckoutHandler, InitiateCheckoutResult,
};
pub use reconcile_payment::{
    ReconcilePaymentCommand, ReconcilePaymentHandler, ReconcilePaymentResult,
};
