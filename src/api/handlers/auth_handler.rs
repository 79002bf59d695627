//! Authentication handlers.

use axum::{extract::State, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserRole;
use crate::errors::AppResult;
use crate::services::{RegisterUser, Registration};
use crate::types::Created;

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1 to 100 characters"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 72,
        message = "Password must be 8 to 72 characters"
    ))]
    #[schema(example = "SecurePass123!", min_length = 8, max_length = 72)]
    pub password: String,
    #[schema(example = "teacher")]
    pub role: UserRole,
}

// Keep the password out of request logs
impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        RegisterUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// Newly registered, still pending, user
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub version: i32,
    /// Plaintext activation token, only present when the server is
    /// configured to expose it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl RegisteredUserResponse {
    fn new(registration: Registration, expose_token: bool) -> Self {
        let Registration { user, token } = registration;
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            version: user.version,
            token: expose_token.then(|| token.into_inner()),
        }
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/authentication/register", post(register))
}

/// Register a new user and send the activation email
#[utoipa::path(
    post,
    path = "/v1/authentication/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, activation email sent", body = RegisteredUserResponse),
        (status = 400, description = "Validation error or duplicate username/email"),
        (status = 500, description = "Registration could not be completed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<RegisteredUserResponse>> {
    let registration = state.registration.register(payload.into()).await?;

    Ok(Created(RegisteredUserResponse::new(
        registration,
        state.expose_activation_token,
    )))
}
