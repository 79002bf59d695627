//! Profile handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::AppState;
use crate::domain::Profile;
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user-profiles/:profile_id", get(get_profile))
}

/// Get a profile by its own ID
#[utoipa::path(
    get,
    path = "/v1/user-profiles/{profile_id}",
    tag = "Profiles",
    params(("profile_id" = i64, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 400, description = "Invalid profile ID"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile_id: i64 = profile_id
        .parse()
        .map_err(|_| AppError::validation("profile_id must be an integer"))?;

    let profile = state.user_service.get_profile_by_id(profile_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}
