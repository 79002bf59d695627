//! Unit of Work pattern implementation.
//!
//! Registration writes three rows and activation reads, updates and deletes
//! across two tables; each of those must land atomically. The Unit of Work
//! owns the transaction lifecycle and hands out repositories bound to it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IsolationLevel, QueryFilter, QuerySelect, Set,
    SqlErr, TransactionTrait,
};
use std::sync::Arc;

use super::db::with_deadline;
use super::repositories::entities::{
    profile, user, user_invitation, InvitationActiveModel, InvitationEntity, ProfileActiveModel,
    ProfileEntity, UserActiveModel, UserEntity,
};
use super::repositories::{UserRepository, UserStore};
use crate::domain::{Invitation, Profile, User, UserRole};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly due to the generic `transaction` method.
/// For testing, mock at the service level or use integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the read-side user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a read-committed transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn profiles(&self) -> TxProfileRepository<'_> {
        TxProfileRepository { txn: self.txn }
    }

    pub fn invitations(&self) -> TxInvitationRepository<'_> {
        TxInvitationRepository { txn: self.txn }
    }

    /// Flip `user` to active and consume its invitations.
    ///
    /// `NotFound` when another transaction changed the user since `user` was
    /// read, or already consumed the invitations.
    pub async fn redeem_invitation(&self, user: &User) -> AppResult<()> {
        if self.users().mark_active(user.id, user.version).await? == 0 {
            return Err(AppError::NotFound);
        }

        if self.invitations().delete_for_user(user.id).await? == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Delete a user together with its invitations and profile.
    ///
    /// Dependents go first so the removal does not lean on the store's
    /// cascade support. `NotFound` when the user row is already gone.
    pub async fn remove_user(&self, user_id: i64) -> AppResult<()> {
        self.invitations().delete_for_user(user_id).await?;
        self.profiles().delete_for_user(user_id).await?;

        if self.users().delete(user_id).await? == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = with_deadline(self.db.begin_with_config(
            Some(IsolationLevel::ReadCommitted),
            Some(AccessMode::ReadWrite),
        ))
        .await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                with_deadline(txn.commit()).await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Map a unique-constraint violation on `users` to the duplicate kind it
/// stands for. The violated column is read from the driver message, which
/// names it on every supported backend.
fn classify_user_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("email") => {
            AppError::DuplicateEmail
        }
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("username") => {
            AppError::DuplicateUsername
        }
        _ => AppError::Database(err),
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    /// Insert a pending user.
    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> AppResult<User> {
        let active_model = UserActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role.into()),
            is_active: Set(false),
            created_at: Set(created_at),
            version: Set(1),
            ..Default::default()
        };

        let model = with_deadline(active_model.insert(self.txn))
            .await
            .map_err(classify_user_insert_error)?;

        Ok(User::from(model))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = with_deadline(UserEntity::find_by_id(id).one(self.txn)).await?;
        Ok(result.map(User::from))
    }

    /// Flip the user to active if nobody changed it since `expected_version`.
    ///
    /// Returns the number of rows touched; zero means the version moved on.
    pub async fn mark_active(&self, id: i64, expected_version: i32) -> AppResult<u64> {
        let result = with_deadline(
            UserEntity::update_many()
                .col_expr(user::Column::IsActive, Expr::value(true))
                .col_expr(
                    user::Column::Version,
                    Expr::col(user::Column::Version).add(1),
                )
                .filter(user::Column::Id.eq(id))
                .filter(user::Column::Version.eq(expected_version))
                .exec(self.txn),
        )
        .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        let result = with_deadline(UserEntity::delete_by_id(id).exec(self.txn)).await?;
        Ok(result.rows_affected)
    }
}

/// Transaction-aware profile repository.
pub struct TxProfileRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProfileRepository<'a> {
    /// Insert the empty profile that accompanies every new user.
    pub async fn create_for_user(
        &self,
        user_id: i64,
        created_at: DateTime<Utc>,
    ) -> AppResult<Profile> {
        let active_model = ProfileActiveModel {
            user_id: Set(user_id),
            identification: Set(None),
            first_name: Set(None),
            last_name: Set(None),
            created_at: Set(created_at),
            ..Default::default()
        };

        let model = with_deadline(active_model.insert(self.txn)).await?;
        Ok(Profile::from(model))
    }

    pub async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let result = with_deadline(
            ProfileEntity::delete_many()
                .filter(profile::Column::UserId.eq(user_id))
                .exec(self.txn),
        )
        .await?;
        Ok(result.rows_affected)
    }
}

/// Transaction-aware invitation repository.
pub struct TxInvitationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxInvitationRepository<'a> {
    pub async fn create(&self, invitation: Invitation) -> AppResult<()> {
        let active_model = InvitationActiveModel {
            token_hash: Set(invitation.token_hash),
            user_id: Set(invitation.user_id),
            expiration: Set(invitation.expiration),
        };

        with_deadline(InvitationEntity::insert(active_model).exec_without_returning(self.txn))
            .await?;
        Ok(())
    }

    /// Find an unexpired invitation by digest and lock its row until the
    /// transaction ends.
    pub async fn find_live(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Invitation>> {
        let result = with_deadline(
            InvitationEntity::find()
                .filter(user_invitation::Column::TokenHash.eq(token_hash))
                .filter(user_invitation::Column::Expiration.gt(now))
                .lock_exclusive()
                .one(self.txn),
        )
        .await?;

        Ok(result.map(Invitation::from))
    }

    pub async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let result = with_deadline(
            InvitationEntity::delete_many()
                .filter(user_invitation::Column::UserId.eq(user_id))
                .exec(self.txn),
        )
        .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_unclassified_errors_stay_database_errors() {
        let err = classify_user_insert_error(DbErr::Custom("boom".into()));
        assert!(matches!(err, AppError::Database(_)));

        let err = classify_user_insert_error(DbErr::Query(RuntimeErr::Internal("boom".into())));
        assert!(matches!(err, AppError::Database(_)));
    }
}
