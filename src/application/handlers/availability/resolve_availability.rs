//! ResolveAvailabilityHandler - Query handler for a mentor's open slots.

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::booking::BookingError;
use crate::domain::foundation::MentorId;
use crate::domain::scheduling::{resolve_slots, AvailabilityRules, Slot};
use crate::ports::{BookingStore, MentorDirectory};

/// Query for a mentor's open slots within a date window.
#[derive(Debug, Clone)]
pub struct ResolveAvailabilityQuery {
    pub mentor_id: MentorId,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

/// Handler resolving open slots for a mentor.
///
/// Availability is never stored: it is the daily template applied to the
/// window minus slots held by existing bookings. Read-only.
pub struct ResolveAvailabilityHandler {
    directory: Arc<dyn MentorDirectory>,
    store: Arc<dyn BookingStore>,
    rules: AvailabilityRules,
}

impl ResolveAvailabilityHandler {
    pub fn new(
        directory: Arc<dyn MentorDirectory>,
        store: Arc<dyn BookingStore>,
        rules: AvailabilityRules,
    ) -> Self {
        Self {
            directory,
            store,
            rules,
        }
    }

    pub async fn handle(
        &self,
        query: ResolveAvailabilityQuery,
    ) -> Result<Vec<Slot>, BookingError> {
        if query.window_start > query.window_end {
            return Err(BookingError::invalid_window(
                query.window_start,
                query.window_end,
            ));
        }

        // Hidden mentors are indistinguishable from missing ones.
        let mentor = self
            .directory
            .find_mentor(&query.mentor_id)
            .await?
            .filter(|m| m.visible)
            .ok_or(BookingError::MentorNotFound(query.mentor_id))?;

        // A mentor with nothing to sell has nothing to schedule.
        if !mentor.is_bookable() {
            return Ok(Vec::new());
        }

        let taken = self
            .taken_starts(&query.mentor_id, query.window_start, query.window_end)
            .await?;

        Ok(resolve_slots(
            &self.rules,
            query.window_start,
            query.window_end,
            Utc::now(),
            &taken,
        ))
    }

    /// Collects the start instants held by bookings in the window.
    async fn taken_starts(
        &self,
        mentor_id: &MentorId,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<HashSet<chrono::DateTime<Utc>>, BookingError> {
        let to_date = window_end
            .succ_opt()
            .ok_or_else(|| BookingError::infrastructure("window end out of range"))?;
        let from = Utc.from_utc_datetime(&window_start.and_time(chrono::NaiveTime::MIN));
        let to = Utc.from_utc_datetime(&to_date.and_time(chrono::NaiveTime::MIN));

        let bookings = self.store.list_for_mentor(mentor_id, from, to).await?;
        Ok(bookings
            .iter()
            .filter(|b| b.holds_slot())
            .map(|b| *b.starts_at.as_datetime())
            .collect())
    }
}
