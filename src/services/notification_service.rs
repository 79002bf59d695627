//! Notification service - activation email delivery with retries.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::TEMPLATE_USER_INVITATION;
use crate::errors::{AppError, AppResult};
use crate::mailer::{Mailer, TemplateData};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Activation notifier trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivationNotifier: Send + Sync {
    /// Deliver the invitation email. Never touches the database.
    async fn send_activation_email(
        &self,
        username: &str,
        email: &str,
        activation_url: &str,
    ) -> AppResult<()>;
}

/// Mailer-backed notifier with exponential backoff between attempts.
pub struct MailNotifier {
    mailer: Arc<dyn Mailer>,
    max_attempts: u32,
    base_delay: Duration,
    sandbox: bool,
}

impl MailNotifier {
    /// `max_attempts` below one is treated as one.
    pub fn new(
        mailer: Arc<dyn Mailer>,
        max_attempts: u32,
        base_delay: Duration,
        sandbox: bool,
    ) -> Self {
        Self {
            mailer,
            max_attempts: max_attempts.max(1),
            base_delay,
            sandbox,
        }
    }

    /// Delay slept after failed attempt number `attempt` (zero based).
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[async_trait]
impl ActivationNotifier for MailNotifier {
    async fn send_activation_email(
        &self,
        username: &str,
        email: &str,
        activation_url: &str,
    ) -> AppResult<()> {
        let data = TemplateData {
            username: username.to_string(),
            activation_url: activation_url.to_string(),
        };

        let mut last_error = String::new();

        for attempt in 0..self.max_attempts {
            match self
                .mailer
                .send(TEMPLATE_USER_INVITATION, username, email, &data, self.sandbox)
                .await
            {
                Ok(status) => {
                    tracing::info!(
                        to = %email,
                        status,
                        attempt = attempt + 1,
                        "Activation email sent"
                    );
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        to = %email,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Activation email attempt failed"
                    );
                    last_error = e.to_string();
                }
            }

            if attempt + 1 < self.max_attempts {
                tokio::time::sleep(self.backoff(attempt)).await;
            }
        }

        Err(AppError::Delivery(format!(
            "gave up after {} attempts: {}",
            self.max_attempts, last_error
        )))
    }
}
