//! TeacherApp - user identity and invitation backend
//!
//! Registers users together with their profile and a time-limited
//! invitation, delivers the activation email (undoing the registration if
//! delivery fails), and redeems invitation tokens exactly once.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations, repositories, Unit of Work
//! - **mailer**: Outbound mail contract and transports
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod mailer;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
