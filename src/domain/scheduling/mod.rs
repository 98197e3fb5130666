//! Scheduling module - slots and the pure availability computation.

mod rules;
mod slot;

pub use rules::{resolve_slots, slot_is_open, AvailabilityRules};
pub use slot::Slot;
