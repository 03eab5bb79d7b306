//! Outbound mail: the [`Mailer`] seam and its SMTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde_json::Value;
use tracing::{error, info, warn};

use social_core::config::mail::MailConfig;
use social_core::error::AppError;
use social_core::result::AppResult;

use super::template;

/// Display name used in the `From` header.
const FROM_NAME: &str = "Social";

/// Status reported for a delivered or sandboxed message.
pub const STATUS_OK: u16 = 200;

/// Sends templated email.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Render `template` with `vars` and send it to `recipient_address`.
    ///
    /// In sandbox mode nothing leaves the process and [`STATUS_OK`] is returned.
    async fn send(
        &self,
        template: &str,
        recipient_name: &str,
        recipient_address: &str,
        vars: &Value,
        sandbox: bool,
    ) -> AppResult<u16>;
}

/// SMTP relay mailer with STARTTLS and linear-backoff retries.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    max_retries: u32,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Build the relay transport from configuration. No connection is made yet,
    /// but the connection pool needs a running Tokio runtime.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let from: Address = config.from_email.parse().map_err(|e| {
            AppError::configuration(format!("Invalid sender '{}': {e}", config.from_email))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| {
                AppError::configuration(format!("Invalid SMTP relay '{}': {e}", config.smtp_host))
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .timeout(Some(Duration::from_secs(10)))
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP mailer initialized"
        );

        Ok(Self {
            transport,
            from: Mailbox::new(Some(FROM_NAME.to_string()), from),
            max_retries: config.max_retries.max(1),
        })
    }

    fn build_message(
        &self,
        subject: String,
        body: String,
        recipient_name: &str,
        recipient_address: &str,
    ) -> AppResult<Message> {
        let to: Address = recipient_address
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid recipient address: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(recipient_name.to_string()), to))
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| AppError::internal(format!("Failed to build email: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        template: &str,
        recipient_name: &str,
        recipient_address: &str,
        vars: &Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        if sandbox {
            info!(template, recipient = recipient_address, "Sandbox mode, email not sent");
            return Ok(STATUS_OK);
        }

        let rendered = template::render(template, vars)?;
        let message = self.build_message(
            rendered.subject,
            rendered.body,
            recipient_name,
            recipient_address,
        )?;

        for attempt in 1..=self.max_retries {
            match self.transport.send(message.clone()).await {
                Ok(_) => {
                    info!(template, recipient = recipient_address, attempt, "Email sent");
                    return Ok(STATUS_OK);
                }
                Err(e) => {
                    warn!(
                        template,
                        recipient = recipient_address,
                        attempt,
                        error = %e,
                        "Failed to send email"
                    );
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
                    }
                }
            }
        }

        error!(
            template,
            recipient = recipient_address,
            attempts = self.max_retries,
            "Giving up on email"
        );
        Err(AppError::external_service(format!(
            "failed to send email to {recipient_address} after {} attempts",
            self.max_retries
        )))
    }
}
