//! 统一的应用状态。

use std::sync::Arc;

use anyhow::Context;
use folio_core::domain::{
    BestEffortFlow, CaptchaVerifier, MailTransport, ReportFailureFlow, WebhookSink,
};
use folio_dispatch::{Disabled, DiscordWebhook, EventBroadcaster, SiteVerifyCaptcha, SmtpMailer};
use folio_gallery::{FsReader, Gallery, PathSanitizer};
use tracing::info;

use super::subscriber::SubscriberBoard;
use crate::config::ServerConfig;

/// 未配置邮件时使用的主题前缀。
const DEFAULT_SUBJECT_PREFIX: &str = "[portfolio]";

/// 外发适配器集合。
pub struct Adapters {
    pub mail: Arc<dyn MailTransport>,
    pub webhook: Arc<dyn WebhookSink>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}

impl Adapters {
    /// 全部禁用的适配器。
    pub fn disabled() -> Self {
        Self {
            mail: Arc::new(Disabled("mail")),
            webhook: Arc::new(Disabled("webhook")),
            captcha: Arc::new(Disabled("captcha")),
        }
    }
}

/// 统一的应用状态，包含所有请求共享的数据。
pub struct AppState {
    /// 相册目录浏览（含列表缓存）。
    pub gallery: Gallery,
    /// 邮件联系表单，失败会告知访客。
    pub contact: ReportFailureFlow,
    /// 机器人支持表单，失败不告知访客。
    pub bot_contact: BestEffortFlow,
    /// 验证码校验。
    pub captcha: Arc<dyn CaptchaVerifier>,
    /// 最近订阅者记录。
    pub subscribers: SubscriberBoard,
    /// 外发事件广播。
    pub events: EventBroadcaster,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(
        gallery: Gallery,
        adapters: Adapters,
        subject_prefix: impl Into<String>,
        event_buffer_size: usize,
    ) -> Self {
        Self {
            gallery,
            contact: ReportFailureFlow::new(adapters.mail, subject_prefix),
            bot_contact: BestEffortFlow::new(adapters.webhook),
            captcha: adapters.captcha,
            subscribers: SubscriberBoard::new(event_buffer_size),
            events: EventBroadcaster::new(event_buffer_size),
        }
    }

    /// 按配置构建状态，未配置的外发渠道使用禁用实现。
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let sanitizer = PathSanitizer::new(&config.gallery.root).with_context(|| {
            format!(
                "failed to resolve gallery root: {}",
                config.gallery.root.display()
            )
        })?;
        info!(
            root = %sanitizer.root().display(),
            freshness_secs = config.gallery.freshness_secs,
            "gallery configured"
        );
        let gallery = Gallery::new(sanitizer, Arc::new(FsReader), config.gallery.freshness());

        let mut adapters = Adapters::disabled();
        let mut subject_prefix = DEFAULT_SUBJECT_PREFIX.to_string();

        if let Some(mail) = &config.mail {
            adapters.mail =
                Arc::new(SmtpMailer::new(mail).context("invalid [mail] configuration")?);
            subject_prefix = mail.subject_prefix.clone();
            info!(host = %mail.host, "smtp relay configured");
        }
        if let Some(webhook) = &config.webhook {
            adapters.webhook =
                Arc::new(DiscordWebhook::new(webhook).context("invalid [webhook] configuration")?);
            info!("contact webhook configured");
        }
        if let Some(captcha) = &config.captcha {
            adapters.captcha = Arc::new(
                SiteVerifyCaptcha::new(captcha).context("invalid [captcha] configuration")?,
            );
            info!(verify_url = %captcha.verify_url, "captcha verification configured");
        }

        Ok(Self::new(
            gallery,
            adapters,
            subject_prefix,
            config.event_buffer_size,
        ))
    }
}
