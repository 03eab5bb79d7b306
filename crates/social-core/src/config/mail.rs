//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// SMTP relay settings for transactional mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address used in the `From` header.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password or API key.
    #[serde(default)]
    pub smtp_password: String,
    /// Number of delivery attempts before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_from_email() -> String {
    "no-reply@socialnetwork.com".to_string()
}

fn default_smtp_host() -> String {
    "live.smtp.mailtrap.io".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_max_retries() -> u32 {
    3
}
