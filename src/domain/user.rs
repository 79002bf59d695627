//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_STUDENT, ROLE_TEACHER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Teacher => ROLE_TEACHER,
            UserRole::Student => ROLE_STUDENT,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_TEACHER => UserRole::Teacher,
            _ => UserRole::Student,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// False until the invitation is redeemed
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Optimistic concurrency counter, bumped on every update
    pub version: i32,
}

impl User {
    /// Waiting for its invitation to be redeemed
    pub fn is_pending(&self) -> bool {
        !self.is_active
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[schema(example = "teacher")]
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            version: user.version,
        }
    }
}
