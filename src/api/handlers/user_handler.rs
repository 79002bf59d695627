//! User handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::LoadedUser;
use crate::api::AppState;
use crate::domain::{Profile, UserResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, NoContent};

/// A user together with its profile
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetailsResponse {
    pub user: UserResponse,
    pub profile: Profile,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/getAll", get(list_users))
        .route("/users/activate/:token", put(activate_user))
        .route("/users/:user_id", get(get_user).delete(delete_user))
}

/// List every user, pending or active
#[utoipa::path(
    get,
    path = "/v1/users/getAll",
    tag = "Users",
    responses(
        (status = 200, description = "All users, oldest first", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.user_service.list_users().await?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Redeem an activation token
#[utoipa::path(
    put,
    path = "/v1/users/activate/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "Activation token from the invitation email")),
    responses(
        (status = 204, description = "User activated"),
        (status = 404, description = "Token unknown, expired or already used")
    )
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<NoContent> {
    state.identity_service.activate(&token).await?;
    Ok(NoContent)
}

/// Get a user and its profile
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDetailsResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    LoadedUser(user): LoadedUser,
) -> AppResult<Json<ApiResponse<UserDetailsResponse>>> {
    let profile = state.user_service.get_profile(user.id).await?;

    Ok(Json(ApiResponse::success(UserDetailsResponse {
        user: UserResponse::from(user),
        profile,
    })))
}

/// Delete a user with its profile and invitations
#[utoipa::path(
    delete,
    path = "/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    LoadedUser(user): LoadedUser,
) -> AppResult<NoContent> {
    state.user_service.delete_user(user.id).await?;
    Ok(NoContent)
}
