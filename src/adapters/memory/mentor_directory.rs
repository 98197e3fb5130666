//! In-memory mentor directory for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, MentorId};
use crate::domain::mentor::MentorProfile;
use crate::ports::MentorDirectory;

/// Mentor directory backed by a mutex-guarded map.
pub struct InMemoryMentorDirectory {
    mentors: Mutex<HashMap<MentorId, MentorProfile>>,
}

impl InMemoryMentorDirectory {
    pub fn new() -> Self {
        Self {
            mentors: Mutex::new(HashMap::new()),
        }
    }

    /// Adds or replaces a mentor profile.
    pub fn insert(&self, mentor: MentorProfile) {
        self.mentors.lock().unwrap().insert(mentor.id, mentor);
    }
}

impl Default for InMemoryMentorDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MentorDirectory for InMemoryMentorDirectory {
    async fn find_mentor(&self, id: &MentorId) -> Result<Option<MentorProfile>, DomainError> {
        Ok(self.mentors.lock().unwrap().get(id).cloned())
    }
}
