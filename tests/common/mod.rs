//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with the real
//! migrations applied. The pool is pinned to a single connection because
//! each SQLite memory connection is a separate database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{EntityTrait, PaginatorTrait};

use teacherapp::config::Config;
use teacherapp::domain::UserRole;
use teacherapp::infra::repositories::entities::{InvitationEntity, ProfileEntity, UserEntity};
use teacherapp::infra::{Database, Persistence};
use teacherapp::mailer::{MailError, Mailer, TemplateData};
use teacherapp::services::{IdentityManager, RegisterUser};

pub const FRONTEND_URL: &str = "http://localhost:4000";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        db_max_open_conns: 1,
        db_min_idle_conns: 1,
        app_env: "test".to_string(),
        frontend_url: FRONTEND_URL.to_string(),
        mail_max_retries: 2,
        mail_retry_base_delay_ms: 0,
        ..Config::default()
    }
}

pub async fn test_database() -> Arc<Database> {
    let db = Database::connect(&test_config())
        .await
        .expect("in-memory database should start");
    Arc::new(db)
}

pub fn identity_manager(db: &Database) -> IdentityManager<Persistence> {
    IdentityManager::new(
        Arc::new(Persistence::new(db.get_connection())),
        test_config().invitation_validity(),
    )
}

pub fn register_command(username: &str, email: &str) -> RegisterUser {
    RegisterUser {
        username: username.to_string(),
        email: email.to_string(),
        password: "SuperSecret123".to_string(),
        role: UserRole::Teacher,
    }
}

/// Row counts as (users, profiles, invitations)
pub async fn row_counts(db: &Database) -> (u64, u64, u64) {
    let conn = db.connection();
    (
        UserEntity::find().count(conn).await.expect("count users"),
        ProfileEntity::find().count(conn).await.expect("count profiles"),
        InvitationEntity::find().count(conn).await.expect("count invitations"),
    )
}

/// Mailer that records every message and always succeeds.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, TemplateData)>>,
}

impl RecordingMailer {
    /// Token carried by the most recent activation link sent to `email`.
    pub fn token_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().expect("mailer lock");
        sent.iter()
            .rev()
            .find(|(to, _)| to == email)
            .and_then(|(_, data)| data.activation_url.rsplit('/').next().map(str::to_string))
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock").len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        _template: &str,
        _username: &str,
        email: &str,
        data: &TemplateData,
        _sandbox: bool,
    ) -> Result<u16, MailError> {
        self.sent
            .lock()
            .expect("mailer lock")
            .push((email.to_string(), data.clone()));
        Ok(200)
    }
}

/// Mailer whose transport is always down.
#[derive(Default)]
pub struct FailingMailer {
    attempts: AtomicU32,
}

impl FailingMailer {
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(
        &self,
        _template: &str,
        _username: &str,
        _email: &str,
        _data: &TemplateData,
        _sandbox: bool,
    ) -> Result<u16, MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MailError::Transport("connection refused".to_string()))
    }
}
