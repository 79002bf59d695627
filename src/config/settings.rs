//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_APP_ENV, DEFAULT_DATABASE_URL, DEFAULT_DB_MAX_IDLE_TIME_MINUTES,
    DEFAULT_DB_MAX_OPEN_CONNS, DEFAULT_DB_MIN_IDLE_CONNS, DEFAULT_FRONTEND_URL,
    DEFAULT_INVITATION_EXPIRATION_HOURS, DEFAULT_MAIL_FROM_ADDRESS, DEFAULT_MAIL_MAX_RETRIES,
    DEFAULT_MAIL_RETRY_BASE_DELAY_MS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, ENV_PRODUCTION,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_open_conns: u32,
    pub db_min_idle_conns: u32,
    pub db_max_idle_time_minutes: u64,
    pub server_host: String,
    pub server_port: u16,
    pub app_env: String,
    pub frontend_url: String,
    pub invitation_expiration_hours: i64,
    pub mail_from_address: String,
    pub mail_max_retries: u32,
    pub mail_retry_base_delay_ms: u64,
    /// Echo the plaintext activation token in the registration response.
    pub expose_activation_token: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_open_conns", &self.db_max_open_conns)
            .field("db_min_idle_conns", &self.db_min_idle_conns)
            .field("db_max_idle_time_minutes", &self.db_max_idle_time_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_env", &self.app_env)
            .field("frontend_url", &self.frontend_url)
            .field("invitation_expiration_hours", &self.invitation_expiration_hours)
            .field("mail_from_address", &self.mail_from_address)
            .field("mail_max_retries", &self.mail_max_retries)
            .field("mail_retry_base_delay_ms", &self.mail_retry_base_delay_ms)
            .field("expose_activation_token", &self.expose_activation_token)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_open_conns: DEFAULT_DB_MAX_OPEN_CONNS,
            db_min_idle_conns: DEFAULT_DB_MIN_IDLE_CONNS,
            db_max_idle_time_minutes: DEFAULT_DB_MAX_IDLE_TIME_MINUTES,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            app_env: DEFAULT_APP_ENV.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            invitation_expiration_hours: DEFAULT_INVITATION_EXPIRATION_HOURS,
            mail_from_address: DEFAULT_MAIL_FROM_ADDRESS.to_string(),
            mail_max_retries: DEFAULT_MAIL_MAX_RETRIES,
            mail_retry_base_delay_ms: DEFAULT_MAIL_RETRY_BASE_DELAY_MS,
            expose_activation_token: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults in `constants`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_open_conns: parse_var("DB_MAX_OPEN_CONNS", defaults.db_max_open_conns),
            db_min_idle_conns: parse_var("DB_MIN_IDLE_CONNS", defaults.db_min_idle_conns),
            db_max_idle_time_minutes: parse_var(
                "DB_MAX_IDLE_TIME_MINUTES",
                defaults.db_max_idle_time_minutes,
            ),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            app_env: env::var("APP_ENV").unwrap_or(defaults.app_env),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            invitation_expiration_hours: parse_var(
                "INVITATION_EXPIRATION_HOURS",
                defaults.invitation_expiration_hours,
            ),
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or(defaults.mail_from_address),
            mail_max_retries: parse_var("MAIL_MAX_RETRIES", defaults.mail_max_retries),
            mail_retry_base_delay_ms: parse_var(
                "MAIL_RETRY_BASE_DELAY_MS",
                defaults.mail_retry_base_delay_ms,
            ),
            expose_activation_token: env::var("EXPOSE_ACTIVATION_TOKEN")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.expose_activation_token),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Outside production, mail goes through the provider's sandbox.
    pub fn mail_sandbox(&self) -> bool {
        self.app_env != ENV_PRODUCTION
    }

    /// How long a freshly issued invitation stays redeemable.
    pub fn invitation_validity(&self) -> chrono::Duration {
        chrono::Duration::hours(self.invitation_expiration_hours)
    }

    /// Base delay between mail delivery attempts.
    pub fn mail_retry_base_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.mail_retry_base_delay_ms)
    }
}

fn parse_var<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
