//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::config::is_valid_role;
use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::user_invitation::Entity")]
    Invitations,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::user_invitation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invitations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        if !is_valid_role(&model.role) {
            tracing::warn!(
                user_id = model.id,
                role = %model.role,
                "Unknown stored role, treating as student"
            );
        }

        User {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role: UserRole::from(model.role.as_str()),
            is_active: model.is_active,
            created_at: model.created_at,
            version: model.version,
        }
    }
}
