//! Identity service - account creation, activation and compensation.
//!
//! Every write here goes through one Unit of Work transaction, so a user
//! never exists without its profile and invitation, and an invitation is
//! never consumed without the user flipping to active.

use async_trait::async_trait;
use chrono::{Duration, SubsecRound, Utc};
use std::sync::Arc;

use crate::domain::{
    lookup_hash, ActivationToken, Invitation, IssuedInvitation, Password, User, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Input for account creation.
#[derive(Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// A committed pending user and the plaintext token that activates it.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub token: ActivationToken,
}

/// Identity service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create a pending user, its empty profile and one invitation atomically.
    async fn register_user(&self, cmd: RegisterUser) -> AppResult<Registration>;

    /// Redeem an invitation token. Wrong, expired and already used tokens
    /// all yield `NotFound`.
    async fn activate(&self, token: &str) -> AppResult<()>;

    /// Undo a registration whose follow-up failed. Any failure comes back
    /// as `AppError::Compensation` and is not retried.
    async fn compensate(&self, user_id: i64) -> AppResult<()>;
}

/// Concrete implementation of IdentityService using Unit of Work.
pub struct IdentityManager<U: UnitOfWork> {
    uow: Arc<U>,
    invitation_validity: Duration,
}

impl<U: UnitOfWork> IdentityManager<U> {
    pub fn new(uow: Arc<U>, invitation_validity: Duration) -> Self {
        Self {
            uow,
            invitation_validity,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> IdentityService for IdentityManager<U> {
    async fn register_user(&self, cmd: RegisterUser) -> AppResult<Registration> {
        // Hashing touches no rows, so it runs before a connection is held
        let password_hash = Password::new(&cmd.password)?.into_string();

        // Microsecond precision survives every backend's timestamp type, so
        // created_at and the expiration stay exactly `validity` apart
        let now = Utc::now().trunc_subsecs(6);
        let IssuedInvitation {
            token,
            lookup_hash,
            expires_at,
        } = IssuedInvitation::issue(self.invitation_validity, now);

        let RegisterUser {
            username,
            email,
            role,
            ..
        } = cmd;

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx
                        .users()
                        .create(username, email, password_hash, role, now)
                        .await?;

                    ctx.profiles().create_for_user(user.id, now).await?;

                    ctx.invitations()
                        .create(Invitation {
                            token_hash: lookup_hash,
                            user_id: user.id,
                            expiration: expires_at,
                        })
                        .await?;

                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User registered, pending activation");

        Ok(Registration { user, token })
    }

    async fn activate(&self, token: &str) -> AppResult<()> {
        let token_hash = lookup_hash(token);

        let user_id = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let now = Utc::now();

                    let invitation = ctx
                        .invitations()
                        .find_live(&token_hash, now)
                        .await?
                        .filter(|invitation| invitation.is_live_at(now))
                        .ok_or_not_found()?;

                    let user = ctx
                        .users()
                        .find_by_id(invitation.user_id)
                        .await?
                        .filter(User::is_pending)
                        .ok_or_not_found()?;

                    ctx.redeem_invitation(&user).await?;
                    Ok(user.id)
                })
            })
            .await?;

        tracing::info!(user_id, "User activated");
        Ok(())
    }

    async fn compensate(&self, user_id: i64) -> AppResult<()> {
        let result = self
            .uow
            .transaction(move |ctx| Box::pin(async move { ctx.remove_user(user_id).await }))
            .await;

        match result {
            Ok(()) => {
                tracing::warn!(user_id, "Registration rolled back by compensation");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    error = ?e,
                    "Compensation failed, user requires manual cleanup"
                );
                Err(AppError::compensation(user_id, format!("{:?}", e)))
            }
        }
    }
}
