//! # Feature: Mail Dispatcher
//!
//! Sends a reminder message to an address, reporting success or failure
//! uniformly regardless of transport. Degrades to a simulated send when no
//! real transport is configured, or when transport verification fails at
//! startup. The operating mode is a one-time process-lifetime decision.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Startup connectivity verification with logged simulated fallback
//! - 1.0.0: Initial simulated/live dispatcher with uniform outcomes

use crate::features::activity::{category, ActivityLog};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

#[cfg(feature = "smtp")]
pub mod smtp;

/// Maximum body preview length recorded for simulated sends.
const PREVIEW_LIMIT: usize = 80;

/// Delivery transport collaborator.
///
/// The dispatcher never depends on wire specifics; anything that can verify
/// connectivity and deliver a message can back live mode.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Check that the transport can reach its server.
    async fn verify(&self) -> Result<()>;

    /// Deliver one message.
    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Uniform result of a dispatch attempt. Never escalates to an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Delivered through the live transport.
    Sent,
    /// Accepted in simulated mode; nothing was transmitted.
    Simulated,
    /// The transport failed; carries the underlying error detail.
    Failed(String),
}

impl SendOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, SendOutcome::Failed(_))
    }
}

#[derive(Clone)]
enum MailerMode {
    Live(Arc<dyn MailTransport>),
    Simulated,
}

/// Shared handle to the mail dispatcher.
#[derive(Clone)]
pub struct Mailer {
    mode: MailerMode,
    log: ActivityLog,
}

impl Mailer {
    /// Dispatcher that logs would-be messages instead of transmitting.
    pub fn simulated(log: ActivityLog) -> Self {
        Mailer {
            mode: MailerMode::Simulated,
            log,
        }
    }

    /// Dispatcher backed by a live transport.
    ///
    /// Verifies connectivity once; on failure the dispatcher falls back to
    /// simulated mode and the fallback is logged.
    pub async fn live(transport: Arc<dyn MailTransport>, log: ActivityLog) -> Self {
        match transport.verify().await {
            Ok(()) => {
                info!("mail transport verified, dispatcher in live mode");
                Mailer {
                    mode: MailerMode::Live(transport),
                    log,
                }
            }
            Err(e) => {
                warn!("mail transport verification failed: {e:#}, falling back to simulated mode");
                log.append(
                    category::EMAIL,
                    format!("transport verification failed ({e:#}), falling back to simulated mode"),
                )
                .await;
                Mailer {
                    mode: MailerMode::Simulated,
                    log,
                }
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.mode, MailerMode::Simulated)
    }

    /// Attempt one send. All transport failures are captured and returned as
    /// a structured [`SendOutcome`]; this method never errors.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> SendOutcome {
        let message_id = Uuid::new_v4();
        match &self.mode {
            MailerMode::Simulated => {
                let preview = preview(body, PREVIEW_LIMIT);
                debug!("[{message_id}] simulated send to {to}: {subject}");
                self.log
                    .append(
                        category::EMAIL,
                        format!("[simulated] to {to}: \"{subject}\" body: {preview}"),
                    )
                    .await;
                SendOutcome::Simulated
            }
            MailerMode::Live(transport) => match transport.deliver(to, subject, body).await {
                Ok(()) => {
                    debug!("[{message_id}] delivered to {to}: {subject}");
                    SendOutcome::Sent
                }
                Err(e) => {
                    warn!("[{message_id}] delivery to {to} failed: {e:#}");
                    SendOutcome::Failed(format!("{e:#}"))
                }
            },
        }
    }
}

/// Truncate text for log previews, UTF-8 boundary safe, with an ellipsis
/// marker when anything was cut.
fn preview(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.len() <= max {
        return flat;
    }
    let mut end = max;
    while !flat.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemClock;

    struct OkTransport;

    #[async_trait]
    impl MailTransport for OkTransport {
        async fn verify(&self) -> Result<()> {
            Ok(())
        }
        async fn deliver(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        async fn verify(&self) -> Result<()> {
            Ok(())
        }
        async fn deliver(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            anyhow::bail!("connection reset by peer")
        }
    }

    struct UnreachableTransport;

    #[async_trait]
    impl MailTransport for UnreachableTransport {
        async fn verify(&self) -> Result<()> {
            anyhow::bail!("could not connect to smtp host")
        }
        async fn deliver(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            anyhow::bail!("unreachable")
        }
    }

    fn activity_log() -> ActivityLog {
        ActivityLog::new(Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn test_simulated_send_always_succeeds() {
        let log = activity_log();
        let mailer = Mailer::simulated(log.clone());
        assert!(mailer.is_simulated());

        let outcome = mailer.send("a@x.com", "Hello", "short body").await;
        assert_eq!(outcome, SendOutcome::Simulated);
        assert!(outcome.is_ok());

        let entries = log.recent_in(category::EMAIL, 10).await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].detail.contains("[simulated]"));
        assert!(entries[0].detail.contains("a@x.com"));
    }

    #[tokio::test]
    async fn test_simulated_send_truncates_long_bodies() {
        let log = activity_log();
        let mailer = Mailer::simulated(log.clone());

        let body = "x".repeat(500);
        mailer.send("a@x.com", "Hello", &body).await;

        let entries = log.recent_in(category::EMAIL, 10).await;
        assert!(entries[0].detail.ends_with("..."));
        assert!(entries[0].detail.len() < 200);
    }

    #[tokio::test]
    async fn test_live_send_reports_transport_failure() {
        let mailer = Mailer::live(Arc::new(FailingTransport), activity_log()).await;
        assert!(!mailer.is_simulated());

        let outcome = mailer.send("a@x.com", "Hello", "body").await;
        match outcome {
            SendOutcome::Failed(detail) => assert!(detail.contains("connection reset")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_live_send_success() {
        let mailer = Mailer::live(Arc::new(OkTransport), activity_log()).await;
        let outcome = mailer.send("a@x.com", "Hello", "body").await;
        assert_eq!(outcome, SendOutcome::Sent);
    }

    #[tokio::test]
    async fn test_verification_failure_falls_back_to_simulated() {
        let log = activity_log();
        let mailer = Mailer::live(Arc::new(UnreachableTransport), log.clone()).await;
        assert!(mailer.is_simulated());

        // The fallback is visible in the activity log
        let entries = log.recent_in(category::EMAIL, 10).await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].detail.contains("falling back to simulated"));

        // And sends now succeed as simulated rather than hitting the transport
        let outcome = mailer.send("a@x.com", "Hello", "body").await;
        assert_eq!(outcome, SendOutcome::Simulated);
    }

    #[test]
    fn test_preview_is_utf8_safe() {
        let text = "héllo wörld ".repeat(20);
        let p = preview(&text, 80);
        assert!(p.ends_with("..."));
        assert!(p.len() <= 84);

        assert_eq!(preview("short", 80), "short");
    }
}
