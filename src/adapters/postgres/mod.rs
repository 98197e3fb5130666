//! PostgreSQL persistence adapters.

mod booking_store;
mod mentor_directory;

pub use booking_store::PostgresBookingStore;
pub use mentor_directory::PostgresMentorDirectory;
