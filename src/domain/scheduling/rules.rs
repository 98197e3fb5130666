//! Availability rules and the slot resolver.
//!
//! Availability is a pure computation: a daily time template applied to
//! each eligible day in a window, minus slots already held by bookings.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use std::collections::HashSet;

use super::Slot;

/// Static availability rules shared by all mentors.
///
/// Per-mentor calendars are a possible extension; today every mentor
/// exposes the same template and the per-mentor variation comes from
/// which slots their bookings already hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRules {
    /// Start times offered on each eligible day, ascending.
    pub daily_template: Vec<NaiveTime>,
    /// Weekdays on which no slots are offered.
    pub excluded_weekdays: Vec<Weekday>,
}

impl Default for AvailabilityRules {
    /// Hourly slots 09:00-16:00 UTC, weekends excluded.
    fn default() -> Self {
        let daily_template = (9..=16)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .collect();
        Self {
            daily_template,
            excluded_weekdays: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

impl AvailabilityRules {
    /// Returns true if the given weekday offers slots at all.
    pub fn offers_on(&self, weekday: Weekday) -> bool {
        !self.excluded_weekdays.contains(&weekday)
    }
}

/// Resolves the open slots for a window.
///
/// Enumerates each day from `window_start` to `window_end` inclusive and
/// applies the daily template, skipping:
/// - days before today (relative to `now`),
/// - excluded weekdays,
/// - times at or before `now` (so today only yields strictly-future slots),
/// - start instants present in `taken`.
///
/// The result is ordered chronologically. An empty result is a valid
/// outcome, not an error.
pub fn resolve_slots(
    rules: &AvailabilityRules,
    window_start: chrono::NaiveDate,
    window_end: chrono::NaiveDate,
    now: DateTime<Utc>,
    taken: &HashSet<DateTime<Utc>>,
) -> Vec<Slot> {
    let today = now.date_naive();
    let mut slots = Vec::new();

    let mut day = window_start;
    while day <= window_end {
        if day >= today && rules.offers_on(day.weekday()) {
            for start in &rules.daily_template {
                let slot = Slot::new(day, *start);
                if slot.is_future(now) && !taken.contains(&slot.starts_at()) {
                    slots.push(slot);
                }
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    slots
}

/// Checks whether one specific slot would be offered for the window
/// containing it.
pub fn slot_is_open(
    rules: &AvailabilityRules,
    slot: &Slot,
    now: DateTime<Utc>,
    taken: &HashSet<DateTime<Utc>>,
) -> bool {
    resolve_slots(rules, slot.date, slot.date, now, taken).contains(slot)
}
