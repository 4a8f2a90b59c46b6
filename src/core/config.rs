//! Environment-driven configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: SMTP settings block with simulated-mode fallback when absent
//! - 1.0.0: Initial config with log level and HTTP bind address

use anyhow::{Context, Result};
use std::env;

/// SMTP transport settings.
///
/// Presence of the full credentials block selects live mail mode; any missing
/// piece leaves the dispatcher in simulated mode. The decision is made once
/// at process start and never re-evaluated.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Use an encrypted transport (STARTTLS). Defaults to true.
    pub tls: bool,
    pub username: String,
    pub password: String,
    /// Sender address for outgoing reminders. Defaults to the username.
    pub from: String,
}

/// Process configuration, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub http_bind: String,
    pub smtp: Option<SmtpSettings>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `LOG_LEVEL`, `HTTP_BIND`, `SMTP_HOST`,
    /// `SMTP_PORT`, `SMTP_TLS`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `MAIL_FROM`.
    pub fn from_env() -> Result<Self> {
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        let smtp = match (
            env::var("SMTP_HOST"),
            env::var("SMTP_USERNAME"),
            env::var("SMTP_PASSWORD"),
        ) {
            (Ok(host), Ok(username), Ok(password)) => {
                let port = match env::var("SMTP_PORT") {
                    Ok(raw) => raw
                        .parse::<u16>()
                        .with_context(|| format!("SMTP_PORT is not a valid port: {raw}"))?,
                    Err(_) => 587,
                };
                let tls = env::var("SMTP_TLS")
                    .map(|v| v.trim().to_lowercase() != "false")
                    .unwrap_or(true);
                let from = env::var("MAIL_FROM").unwrap_or_else(|_| username.clone());

                Some(SmtpSettings {
                    host,
                    port,
                    tls,
                    username,
                    password,
                    from,
                })
            }
            _ => None,
        };

        Ok(Config {
            log_level,
            http_bind,
            smtp,
        })
    }
}
