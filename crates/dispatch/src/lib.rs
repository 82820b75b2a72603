pub mod captcha;
pub mod config;
pub mod disabled;
pub mod events;
pub mod smtp;
pub mod webhook;

pub use captcha::SiteVerifyCaptcha;
pub use config::{CaptchaConfig, SmtpConfig, SmtpSecurity, WebhookConfig};
pub use disabled::Disabled;
pub use events::{Channel, DispatchEvent, EventBroadcaster, EventStream};
pub use folio_core::domain::DispatchError;
pub use smtp::SmtpMailer;
pub use webhook::DiscordWebhook;
