//! Outbound mail contract.
//!
//! The transport is swappable behind the `Mailer` trait. `LogMailer` is the
//! transport shipped with the service; it renders the message and writes it
//! to the log instead of relaying it.

mod log_mailer;
pub mod templates;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use log_mailer::LogMailer;
pub use templates::RenderedMail;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("unknown mail template: {0}")]
    UnknownTemplate(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Values substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "ActivationURL")]
    pub activation_url: String,
}

/// Mail transport trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Render `template` with `data` and deliver it to `email`.
    ///
    /// Returns the transport status code on success. `sandbox` asks the
    /// transport not to reach a real inbox.
    async fn send(
        &self,
        template: &str,
        username: &str,
        email: &str,
        data: &TemplateData,
        sandbox: bool,
    ) -> Result<u16, MailError>;
}
