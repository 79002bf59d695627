//! User service - Handles user and profile lookup and user removal.
//!
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Profile, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID, pending or active
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// List every user, pending or active
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get the profile that belongs to a user
    async fn get_profile(&self, user_id: i64) -> AppResult<Profile>;

    /// Get a profile by its own ID
    async fn get_profile_by_id(&self, id: i64) -> AppResult<Profile>;

    /// Delete a user with its profile and invitations
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().find_all().await
    }

    async fn get_profile(&self, user_id: i64) -> AppResult<Profile> {
        self.uow
            .users()
            .find_profile(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_profile_by_id(&self, id: i64) -> AppResult<Profile> {
        self.uow
            .users()
            .find_profile_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.uow
            .transaction(move |ctx| Box::pin(async move { ctx.remove_user(id).await }))
            .await?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
