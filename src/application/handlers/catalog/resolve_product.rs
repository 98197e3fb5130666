//! ResolveProductHandler - Query handler for a mentor's session product.

use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::catalog::{Product, SessionLength};
use crate::domain::foundation::MentorId;
use crate::ports::MentorDirectory;

/// Query for one of a mentor's purchasable products.
#[derive(Debug, Clone)]
pub struct ResolveProductQuery {
    pub mentor_id: MentorId,
    /// Product tag: quick-chat, full-session, or deep-dive.
    pub product_id: String,
}

/// Handler resolving a (mentor, product tag) pair into a priced product.
///
/// Products are derived from the mentor's rate card on every lookup;
/// nothing is persisted. An unpriced length is `ProductUnavailable`,
/// which is deliberately distinct from `MentorNotFound`.
pub struct ResolveProductHandler {
    directory: Arc<dyn MentorDirectory>,
}

impl ResolveProductHandler {
    pub fn new(directory: Arc<dyn MentorDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self, query: ResolveProductQuery) -> Result<Product, BookingError> {
        let length = SessionLength::from_product_id(&query.product_id).ok_or_else(|| {
            BookingError::validation(
                "product_id",
                format!("unknown product tag '{}'", query.product_id),
            )
        })?;

        let mentor = self
            .directory
            .find_mentor(&query.mentor_id)
            .await?
            .filter(|m| m.visible)
            .ok_or(BookingError::MentorNotFound(query.mentor_id))?;

        mentor
            .product(length)
            .ok_or(BookingError::ProductUnavailable {
                mentor_id: query.mentor_id,
                product: length,
            })
    }
}
