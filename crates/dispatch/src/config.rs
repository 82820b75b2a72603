use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// How the SMTP connection is secured.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS, port 465 unless overridden.
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS, port 587 unless overridden.
    StartTls,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub security: SmtpSecurity,
    pub username: String,
    pub password: SecretString,
    /// Sender mailbox, e.g. `Portfolio <contact@example.com>`.
    pub from: String,
    /// Mailbox that receives the contact form messages.
    pub to: String,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    /// Full webhook URL; it embeds the webhook token, hence the secret.
    pub url: SecretString,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptchaConfig {
    pub secret: SecretString,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CaptchaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_subject_prefix() -> String {
    "[portfolio]".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}
