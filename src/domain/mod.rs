//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod invitation;
pub mod password;
pub mod profile;
pub mod user;

pub use invitation::{lookup_hash, ActivationToken, Invitation, IssuedInvitation};
pub use password::Password;
pub use profile::Profile;
pub use user::{User, UserResponse, UserRole};
