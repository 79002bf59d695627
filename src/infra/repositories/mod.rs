//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Writes go through the transaction-scoped repositories in
//! `infra::unit_of_work`; this module holds the read side.

pub mod entities;
mod user_repository;

pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
