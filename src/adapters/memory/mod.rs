//! In-memory adapters for tests and local development.

mod booking_store;
mod mentor_directory;

pub use booking_store::InMemoryBookingStore;
pub use mentor_directory::InMemoryMentorDirectory;
