//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{auth_handler, profile_handler, user_handler};
use crate::domain::{Profile, UserResponse, UserRole};

/// OpenAPI documentation for the TeacherApp API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TeacherApp API",
        version = "0.1.0",
        description = "User registration, invitation and activation for the teacher management backend"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        user_handler::list_users,
        user_handler::activate_user,
        user_handler::get_user,
        user_handler::delete_user,
        profile_handler::get_profile,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            Profile,
            auth_handler::RegisterRequest,
            auth_handler::RegisteredUserResponse,
            user_handler::UserDetailsResponse,
        )
    ),
    tags(
        (name = "Authentication", description = "User registration"),
        (name = "Users", description = "Activation and user management"),
        (name = "Profiles", description = "Profile lookup")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/v1/authentication/register",
            "/v1/users/activate/{token}",
            "/v1/users/getAll",
            "/v1/users/{user_id}",
            "/v1/user-profiles/{profile_id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
