//! SMTP transport adapter (behind the `smtp` cargo feature)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use crate::core::SmtpSettings;
use crate::features::mailer::MailTransport;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// [`MailTransport`] backed by an async SMTP connection pool.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    /// Build a transport from settings. Does not touch the network; use
    /// [`MailTransport::verify`] for that.
    pub fn connect(settings: &SmtpSettings) -> Result<Self> {
        let builder = if settings.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .with_context(|| format!("invalid SMTP relay host: {}", settings.host))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from = settings
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid MAIL_FROM address: {}", settings.from))?;

        Ok(SmtpMailTransport { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn verify(&self) -> Result<()> {
        let reachable = self
            .transport
            .test_connection()
            .await
            .context("SMTP connection test failed")?;
        if !reachable {
            return Err(anyhow!("SMTP server did not accept the connection"));
        }
        Ok(())
    }

    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .with_context(|| format!("invalid recipient address: {to}"))?)
            .subject(subject)
            .body(body.to_string())
            .context("failed to build message")?;

        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
