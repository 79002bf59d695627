//! Read-side user repository, outside any transaction.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::entities::{profile, user, ProfileEntity, UserEntity};
use crate::domain::{Profile, User};
use crate::errors::AppResult;
use crate::infra::db::with_deadline;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, pending or active
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// All users, oldest first
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find the profile belonging to a user
    async fn find_profile(&self, user_id: i64) -> AppResult<Option<Profile>>;

    /// Find a profile by its own ID
    async fn find_profile_by_id(&self, id: i64) -> AppResult<Option<Profile>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = with_deadline(UserEntity::find_by_id(id).one(&self.db)).await?;
        Ok(result.map(User::from))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let models = with_deadline(
            UserEntity::find()
                .order_by_asc(user::Column::Id)
                .all(&self.db),
        )
        .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_profile(&self, user_id: i64) -> AppResult<Option<Profile>> {
        let result = with_deadline(
            ProfileEntity::find()
                .filter(profile::Column::UserId.eq(user_id))
                .one(&self.db),
        )
        .await?;
        Ok(result.map(Profile::from))
    }

    async fn find_profile_by_id(&self, id: i64) -> AppResult<Option<Profile>> {
        let result = with_deadline(ProfileEntity::find_by_id(id).one(&self.db)).await?;
        Ok(result.map(Profile::from))
    }
}
