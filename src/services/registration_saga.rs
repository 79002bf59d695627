//! Registration workflow.
//!
//! Phase one commits the account through `IdentityService`. Phase two sends
//! the activation email outside any transaction. When phase two fails, the
//! committed account is removed again through `IdentityService::compensate`.

use std::sync::Arc;

use super::{ActivationNotifier, IdentityService, RegisterUser, Registration};
use crate::config::ACTIVATION_PATH;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Two-phase registration with a compensating step.
pub struct RegistrationSaga {
    identity: Arc<dyn IdentityService>,
    notifier: Arc<dyn ActivationNotifier>,
    frontend_url: String,
}

impl RegistrationSaga {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        notifier: Arc<dyn ActivationNotifier>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            notifier,
            frontend_url: frontend_url.into(),
        }
    }

    /// Link the user follows to redeem `token`.
    pub fn activation_url(&self, token: &str) -> String {
        format!(
            "{}{}/{}",
            self.frontend_url.trim_end_matches('/'),
            ACTIVATION_PATH,
            token
        )
    }

    /// Register a user and deliver the activation email.
    ///
    /// On delivery failure the account is compensated and the delivery error
    /// returned. If compensation fails too, its error wins, since that is the
    /// one needing an operator.
    ///
    /// Delivery and compensation run on their own task, so they finish even
    /// when the caller stops waiting after the account has been committed.
    pub async fn register(&self, cmd: RegisterUser) -> AppResult<Registration> {
        let registration = self.identity.register_user(cmd).await?;

        let follow_up = tokio::spawn(deliver_or_compensate(
            self.identity.clone(),
            self.notifier.clone(),
            registration.user.clone(),
            self.activation_url(registration.token.expose()),
        ));

        follow_up.await.map_err(|e| {
            AppError::internal(format!(
                "Activation email task for user {} failed: {}",
                registration.user.id, e
            ))
        })??;

        Ok(registration)
    }
}

async fn deliver_or_compensate(
    identity: Arc<dyn IdentityService>,
    notifier: Arc<dyn ActivationNotifier>,
    user: User,
    activation_url: String,
) -> AppResult<()> {
    let delivery = notifier
        .send_activation_email(&user.username, &user.email, &activation_url)
        .await;

    if let Err(delivery_err) = delivery {
        tracing::error!(
            user_id = user.id,
            error = %delivery_err,
            "Activation email failed, compensating registration"
        );
        identity.compensate(user.id).await?;
        return Err(delivery_err);
    }

    Ok(())
}
