//! Profile domain entity, the one-to-one dependent of a user.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Profile created alongside every user, with all personal fields empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub identification: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// True while no personal field has been filled in
    pub fn is_blank(&self) -> bool {
        self.identification.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}
