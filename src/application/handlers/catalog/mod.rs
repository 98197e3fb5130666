//! Catalog query handlers.

mod resolve_product;

pub use resolve_product::{ResolveProductHandler, ResolveProductQuery};
