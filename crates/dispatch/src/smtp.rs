//! SMTP 邮件发送实现。
//!
//! 通过外部 SMTP 中继单次发送，不重试、不排队。

use async_trait::async_trait;
use folio_core::domain::{DispatchError, MailTransport, OutboundEmail};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::ExposeSecret as _;
use tracing::info;

use crate::config::{SmtpConfig, SmtpSecurity};

/// 基于 lettre 的 SMTP 发送器。
///
/// 发件人与收件人来自进程配置；访客地址只出现在 `Reply-To` 中。
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// 根据配置创建发送器。此时不会建立连接。
    pub fn new(config: &SmtpConfig) -> Result<Self, DispatchError> {
        let builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
        }
        .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let mut builder = builder
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_string(),
            ))
            .timeout(Some(config.timeout()));
        if let Some(port) = config.port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&config.from)?,
            to: parse_mailbox(&config.to)?,
        })
    }

    /// 组装待发送的邮件。
    pub fn build_message(&self, email: &OutboundEmail) -> Result<Message, DispatchError> {
        let reply_address: Address = email
            .reply_to
            .parse()
            .map_err(|e| DispatchError::InvalidAddress(format!("{}: {e}", email.reply_to)))?;
        let reply_to = Mailbox::new(Some(email.reply_to_name.clone()), reply_address);

        Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| DispatchError::Transport(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), DispatchError> {
        let message = self.build_message(&email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        info!(code = %response.code(), "contact email accepted by relay");
        Ok(())
    }
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, DispatchError> {
    raw.parse()
        .map_err(|e| DispatchError::InvalidAddress(format!("{raw}: {e}")))
}
