//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod container;
mod identity_service;
mod notification_service;
mod registration_saga;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use identity_service::{IdentityManager, IdentityService, RegisterUser, Registration};
pub use notification_service::{ActivationNotifier, MailNotifier};
pub use registration_saga::RegistrationSaga;
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use identity_service::MockIdentityService;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockActivationNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
