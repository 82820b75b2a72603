use std::net::IpAddr;

use async_trait::async_trait;
use folio_core::domain::{
    CaptchaVerifier, DispatchError, MailTransport, OutboundEmail, WebhookMessage, WebhookSink,
};

/// Stand-in for an adapter whose configuration section is absent.
///
/// Every dispatch fails with [`DispatchError::NotConfigured`], which each flow
/// then treats according to its own failure policy.
#[derive(Debug, Clone, Copy)]
pub struct Disabled(pub &'static str);

#[async_trait]
impl MailTransport for Disabled {
    async fn send(&self, _email: OutboundEmail) -> Result<(), DispatchError> {
        Err(DispatchError::NotConfigured(self.0))
    }
}

#[async_trait]
impl WebhookSink for Disabled {
    async fn post(&self, _message: WebhookMessage) -> Result<(), DispatchError> {
        Err(DispatchError::NotConfigured(self.0))
    }
}

#[async_trait]
impl CaptchaVerifier for Disabled {
    async fn verify(
        &self,
        _token: &str,
        _remote_ip: Option<IpAddr>,
    ) -> Result<bool, DispatchError> {
        Err(DispatchError::NotConfigured(self.0))
    }
}
