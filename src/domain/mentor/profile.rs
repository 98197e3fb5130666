//! Mentor profile aggregate.

use serde::{Deserialize, Serialize};

use super::RateCard;
use crate::domain::catalog::{Product, SessionLength};
use crate::domain::foundation::MentorId;

/// A mentor as visible to the booking flow.
///
/// Profile content (bio, photos, search ranking) lives elsewhere; this
/// carries only what booking needs: identity, visibility, and pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: MentorId,
    pub display_name: String,
    /// Hidden mentors cannot be discovered or booked.
    pub visible: bool,
    pub rates: RateCard,
}

impl MentorProfile {
    /// Returns true if this mentor can currently accept bookings.
    ///
    /// Requires a visible profile and at least one priced session length.
    pub fn is_bookable(&self) -> bool {
        self.visible && self.rates.has_any_price()
    }

    /// Derives the product for a session length, or None if unpriced.
    pub fn product(&self, length: SessionLength) -> Option<Product> {
        self.rates.price_for(length).map(|price_cents| Product {
            mentor_id: self.id,
            length,
            price_cents,
        })
    }

    /// Derives all products this mentor currently offers.
    pub fn products(&self) -> Vec<Product> {
        self.rates
            .offered_lengths()
            .into_iter()
            .filter_map(|length| self.product(length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mentor_with_rates(rates: RateCard) -> MentorProfile {
        MentorProfile {
            id: MentorId::new(),
            display_name: "Jordan Example".to_string(),
            visible: true,
            rates,
        }
    }

    #[test]
    fn mentor_with_prices_is_bookable() {
        let mentor = mentor_with_rates(RateCard {
            quick_chat_cents: Some(2500),
            ..Default::default()
        });
        assert!(mentor.is_bookable());
    }

    #[test]
    fn mentor_without_prices_is_not_bookable() {
        let mentor = mentor_with_rates(RateCard::default());
        assert!(!mentor.is_bookable());
    }

    #[test]
    fn hidden_mentor_is_not_bookable() {
        let mut mentor = mentor_with_rates(RateCard {
            quick_chat_cents: Some(2500),
            ..Default::default()
        });
        mentor.visible = false;
        assert!(!mentor.is_bookable());
    }

    #[test]
    fn product_carries_rate_card_price() {
        let mentor = mentor_with_rates(RateCard {
            full_session_cents: Some(5000),
            ..Default::default()
        });
        let product = mentor.product(SessionLength::FullSession).unwrap();
        assert_eq!(product.mentor_id, mentor.id);
        assert_eq!(product.price_cents, 5000);
    }

    #[test]
    fn product_is_none_for_unpriced_length() {
        let mentor = mentor_with_rates(RateCard {
            quick_chat_cents: Some(2500),
            ..Default::default()
        });
        assert!(mentor.product(SessionLength::DeepDive).is_none());
    }

    #[test]
    fn products_lists_only_offered_lengths() {
        let mentor = mentor_with_rates(RateCard {
            quick_chat_cents: Some(2500),
            deep_dive_cents: Some(9000),
            ..Default::default()
        });
        let products = mentor.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].length, SessionLength::QuickChat);
        assert_eq!(products[1].length, SessionLength::DeepDive);
    }
}
