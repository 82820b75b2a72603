//! Discord Webhook 投递实现。

use async_trait::async_trait;
use folio_core::domain::{DispatchError, WebhookMessage, WebhookSink};
use reqwest::Client;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use tracing::info;

use crate::config::WebhookConfig;

/// Embed 侧边颜色。
const EMBED_COLOR: u32 = 0x5865F2;

/// Discord 执行 Webhook 请求体。
#[derive(Debug, Serialize)]
struct ExecuteWebhookRequest {
    embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    color: u32,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: String,
    value: String,
    inline: bool,
}

impl From<WebhookMessage> for ExecuteWebhookRequest {
    fn from(message: WebhookMessage) -> Self {
        Self {
            embeds: vec![Embed {
                title: message.title,
                color: EMBED_COLOR,
                fields: message
                    .fields
                    .into_iter()
                    .map(|field| EmbedField {
                        name: field.name,
                        value: field.value,
                        inline: false,
                    })
                    .collect(),
            }],
        }
    }
}

/// 向固定 Webhook 地址发送嵌入消息。
pub struct DiscordWebhook {
    client: Client,
    url: SecretString,
}

impl DiscordWebhook {
    pub fn new(config: &WebhookConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl WebhookSink for DiscordWebhook {
    async fn post(&self, message: WebhookMessage) -> Result<(), DispatchError> {
        let body = ExecuteWebhookRequest::from(message);
        let response = self
            .client
            .post(self.url.expose_secret())
            .json(&body)
            .send()
            .await
            // reqwest 的错误信息会带上完整 URL（含 token）
            .map_err(|e| DispatchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(status = status.as_u16(), "webhook message accepted");
        Ok(())
    }
}
