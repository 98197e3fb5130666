//! Purchasable session products.

use serde::{Deserialize, Serialize};

use super::SessionLength;
use crate::domain::foundation::MentorId;

/// A purchasable advisory session offered by a specific mentor.
///
/// Products are derived from the mentor's rate card on demand and
/// never persisted; the (mentor, length) pair is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub mentor_id: MentorId,
    pub length: SessionLength,
    /// Price in the smallest currency unit (e.g. cents). Never negative.
    pub price_cents: i64,
}

impl Product {
    /// Returns the session duration in minutes.
    pub fn duration_minutes(&self) -> i32 {
        self.length.duration_minutes()
    }

    /// Returns the stable product tag.
    pub fn product_id(&self) -> &'static str {
        self.length.product_id()
    }

    /// Returns a human-readable product name for checkout pages.
    pub fn display_name(&self) -> String {
        format!(
            "{} ({} min)",
            self.length.display_name(),
            self.duration_minutes()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_exposes_length_attributes() {
        let product = Product {
            mentor_id: MentorId::new(),
            length: SessionLength::FullSession,
            price_cents: 5000,
        };
        assert_eq!(product.duration_minutes(), 60);
        assert_eq!(product.product_id(), "full-session");
        assert_eq!(product.display_name(), "Full Session (60 min)");
    }
}
