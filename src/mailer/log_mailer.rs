//! Development transport that logs messages instead of relaying them.

use async_trait::async_trait;

use super::{templates, MailError, Mailer, TemplateData};
use crate::config::MAIL_STATUS_DELIVERED;

/// Mailer that writes rendered messages to the log.
///
/// Only the envelope is logged at info level. The body carries the
/// activation link, so it is emitted at debug level and only in sandbox mode.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from_address: String,
}

impl LogMailer {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(
        &self,
        template: &str,
        username: &str,
        email: &str,
        data: &TemplateData,
        sandbox: bool,
    ) -> Result<u16, MailError> {
        let mail = templates::render(template, data)?;

        tracing::info!(
            from = %self.from_address,
            to = %email,
            username = %username,
            subject = %mail.subject,
            sandbox,
            "Email logged instead of sent"
        );

        if sandbox {
            tracing::debug!("=== EMAIL (not sent) ===\n{}\n========================", mail.body);
        }

        Ok(MAIL_STATUS_DELIVERED)
    }
}
