//! In-memory repositories - used when no database is configured, and in tests.

mod records;
mod users;

pub use records::InMemoryRepository;
pub use users::InMemoryUserRepository;
