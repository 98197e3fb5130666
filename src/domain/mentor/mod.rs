//! Mentor module - profiles and rate cards as seen by the booking flow.

mod profile;
mod rate_card;

pub use profile::MentorProfile;
pub use rate_card::RateCard;
