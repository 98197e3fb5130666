//! Application handlers - one command/query handler per operation.

pub mod availability;
pub mod catalog;
pub mod checkout;
