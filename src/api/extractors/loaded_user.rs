//! Loads the user named by the `user_id` path segment.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::api::AppState;
use crate::domain::User;
use crate::errors::AppError;

/// The user addressed by `/users/:user_id`, already fetched.
///
/// A non-numeric id is a validation error; an unknown id is `NotFound`.
#[derive(Debug, Clone)]
pub struct LoadedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for LoadedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(user_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("user_id must be an integer"))?;

        let user = state.user_service.get_user(user_id).await?;
        Ok(LoadedUser(user))
    }
}
