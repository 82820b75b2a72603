use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

/// An email ready to hand to the outbound mail relay.
///
/// Sender and recipient come from process configuration; only the parts that
/// depend on the visitor travel with the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub reply_to: String,
    pub reply_to_name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookField {
    pub name: String,
    pub value: String,
}

/// A structured chat message, shaped after a Discord embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookMessage {
    pub title: String,
    pub fields: Vec<WebhookField>,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream rejected the request with status {status}")]
    Rejected { status: u16 },

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), DispatchError>;
}

#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn post(&self, message: WebhookMessage) -> Result<(), DispatchError>;
}

/// Verifies a captcha token against the provider.
///
/// `Ok(false)` means the provider answered and rejected the token; `Err`
/// means no verdict could be obtained at all.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> Result<bool, DispatchError>;
}
