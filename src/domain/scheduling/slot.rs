//! Bookable slot value object.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bookable opening in a mentor's calendar: a date plus a start time.
///
/// Slots are computed on demand from availability rules and existing
/// bookings; they are never persisted. All times are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, start: NaiveTime) -> Self {
        Self { date, start }
    }

    /// Returns the slot's start as an absolute UTC instant.
    pub fn starts_at(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(self.start))
    }

    /// Checks if the slot starts strictly after the given instant.
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.starts_at() > now
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.start.format("%H:%M"))
    }
}
