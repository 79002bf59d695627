//! Custom extractors.

mod loaded_user;
mod validated_json;

pub use loaded_user::LoadedUser;
pub use validated_json::ValidatedJson;
