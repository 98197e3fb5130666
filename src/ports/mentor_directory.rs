//! Mentor directory port (read side).
//!
//! The booking flow treats mentor profiles as externally managed data:
//! it only needs to look a mentor up by id to learn visibility and rates.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MentorId};
use crate::domain::mentor::MentorProfile;

/// Read-only port for mentor profile lookup.
#[async_trait]
pub trait MentorDirectory: Send + Sync {
    /// Find a mentor by ID.
    ///
    /// Returns `None` if no such mentor exists. Visibility filtering is
    /// the caller's concern; hidden mentors are returned as-is.
    async fn find_mentor(&self, id: &MentorId) -> Result<Option<MentorProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn mentor_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn MentorDirectory) {}
    }
}
