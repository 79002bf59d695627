//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Public so integration tests can inspect rows directly.

pub mod profile;
pub mod user;
pub mod user_invitation;

pub use profile::{
    ActiveModel as ProfileActiveModel, Entity as ProfileEntity, Model as ProfileModel,
};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
pub use user_invitation::{
    ActiveModel as InvitationActiveModel, Entity as InvitationEntity, Model as InvitationModel,
};
