//! Outbound email over SMTP.

use std::fmt;
use std::sync::Arc;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::errors::AppError;

/// Sends transactional email. Without SMTP configuration every send is a logged no-op.
#[derive(Clone)]
pub struct Mailer {
    inner: Option<Arc<SmtpMailer>>,
}

struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Mailer {
    /// Build a mailer from optional SMTP settings.
    pub fn new(config: Option<&SmtpConfig>) -> Result<Self, AppError> {
        let Some(config) = config else {
            tracing::warn!("SMTP not configured; outgoing email will be skipped");
            return Ok(Self::disabled());
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Internal(format!("SMTP relay error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid from address: {e}")))?;

        Ok(Self {
            inner: Some(Arc::new(SmtpMailer { transport, from })),
        })
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Send a plain-text + HTML message.
    pub async fn send(&self, to: &str, subject: &str, text: &str, html: &str) -> Result<(), AppError> {
        let Some(smtp) = &self.inner else {
            tracing::info!(subject, "Email skipped (SMTP disabled)");
            return Ok(());
        };

        let recipient: Mailbox = to
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(smtp.from.clone())
            .to(recipient)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            ))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        smtp.transport
            .send(message)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send email: {e}")))?;

        tracing::info!(subject, "Email sent");
        Ok(())
    }
}
