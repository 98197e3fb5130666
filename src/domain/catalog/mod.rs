//! Catalog module - session products derived from mentor rate cards.

mod product;
mod session_length;

pub use product::Product;
pub use session_length::SessionLength;
