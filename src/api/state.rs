//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::mailer::{LogMailer, Mailer};
use crate::services::{IdentityService, RegistrationSaga, ServiceContainer, Services, UserService};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Two-phase registration workflow
    pub registration: Arc<RegistrationSaga>,
    /// Activation and compensation
    pub identity_service: Arc<dyn IdentityService>,
    /// User lookup and removal
    pub user_service: Arc<dyn UserService>,
    /// Database connection, for health checks
    pub database: Arc<Database>,
    /// Echo the activation token in the registration response
    pub expose_activation_token: bool,
}

impl AppState {
    /// Build state with the logging mail transport.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let mailer = Arc::new(LogMailer::new(config.mail_from_address.clone()));
        Self::with_mailer(database, config, mailer)
    }

    /// Build state around a specific mail transport.
    pub fn with_mailer(database: Arc<Database>, config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        let container = Services::from_connection(database.get_connection(), config, mailer);
        Self::from_container(&container, database, config.expose_activation_token)
    }

    /// Build state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        database: Arc<Database>,
        expose_activation_token: bool,
    ) -> Self {
        Self {
            registration: container.registration(),
            identity_service: container.identity(),
            user_service: container.users(),
            database,
            expose_activation_token,
        }
    }
}
