//! Service Container - Centralized service access.
//!
//! SOLID (DIP): Handlers depend on service traits, not implementations.

use std::sync::Arc;

use super::{
    ActivationNotifier, IdentityManager, IdentityService, MailNotifier, RegistrationSaga,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;
use crate::mailer::Mailer;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get identity service
    fn identity(&self) -> Arc<dyn IdentityService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get the registration workflow
    fn registration(&self) -> Arc<RegistrationSaga>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    identity_service: Arc<dyn IdentityService>,
    user_service: Arc<dyn UserService>,
    registration: Arc<RegistrationSaga>,
}

impl Services {
    pub fn new(
        identity_service: Arc<dyn IdentityService>,
        user_service: Arc<dyn UserService>,
        notifier: Arc<dyn ActivationNotifier>,
        frontend_url: impl Into<String>,
    ) -> Self {
        let registration = Arc::new(RegistrationSaga::new(
            identity_service.clone(),
            notifier,
            frontend_url,
        ));

        Self {
            identity_service,
            user_service,
            registration,
        }
    }

    /// Wire every service from a database connection, config and transport.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: &Config,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let identity_service = Arc::new(IdentityManager::new(
            uow.clone(),
            config.invitation_validity(),
        ));
        let user_service = Arc::new(UserManager::new(uow));
        let notifier = Arc::new(MailNotifier::new(
            mailer,
            config.mail_max_retries,
            config.mail_retry_base_delay(),
            config.mail_sandbox(),
        ));

        Self::new(
            identity_service,
            user_service,
            notifier,
            config.frontend_url.clone(),
        )
    }
}

impl ServiceContainer for Services {
    fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn registration(&self) -> Arc<RegistrationSaga> {
        self.registration.clone()
    }
}
