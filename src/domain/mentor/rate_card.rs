//! Mentor rate cards.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::SessionLength;

/// Per-length pricing set by a mentor.
///
/// Each entry is optional: an unset price means the mentor does not
/// offer that session length. Prices are in the smallest currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    pub quick_chat_cents: Option<i64>,
    pub full_session_cents: Option<i64>,
    pub deep_dive_cents: Option<i64>,
}

impl RateCard {
    /// Returns the price for a session length, or None if not offered.
    pub fn price_for(&self, length: SessionLength) -> Option<i64> {
        match length {
            SessionLength::QuickChat => self.quick_chat_cents,
            SessionLength::FullSession => self.full_session_cents,
            SessionLength::DeepDive => self.deep_dive_cents,
        }
    }

    /// Returns true if at least one session length is priced.
    pub fn has_any_price(&self) -> bool {
        SessionLength::ALL
            .iter()
            .any(|length| self.price_for(*length).is_some())
    }

    /// Returns the session lengths this rate card offers, in duration order.
    pub fn offered_lengths(&self) -> Vec<SessionLength> {
        SessionLength::ALL
            .iter()
            .copied()
            .filter(|length| self.price_for(*length).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rate_card_offers_nothing() {
        let card = RateCard::default();
        assert!(!card.has_any_price());
        assert!(card.offered_lengths().is_empty());
    }

    #[test]
    fn price_for_returns_matching_entry() {
        let card = RateCard {
            quick_chat_cents: Some(2500),
            full_session_cents: None,
            deep_dive_cents: Some(9000),
        };
        assert_eq!(card.price_for(SessionLength::QuickChat), Some(2500));
        assert_eq!(card.price_for(SessionLength::FullSession), None);
        assert_eq!(card.price_for(SessionLength::DeepDive), Some(9000));
    }

    #[test]
    fn offered_lengths_skips_unset_entries() {
        let card = RateCard {
            quick_chat_cents: Some(2500),
            full_session_cents: None,
            deep_dive_cents: Some(9000),
        };
        assert_eq!(
            card.offered_lengths(),
            vec![SessionLength::QuickChat, SessionLength::DeepDive]
        );
    }
}
