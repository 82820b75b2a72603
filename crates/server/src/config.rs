use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use folio_dispatch::{CaptchaConfig, SmtpConfig, WebhookConfig};
use folio_gallery::DEFAULT_FRESHNESS;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::info;

type Result<T> = anyhow::Result<T>;

pub const DEFAULT_CONFIG_PATH: &str = "folio.toml";

/// Process-wide configuration, read once at startup and immutable afterwards.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub mail: Option<SmtpConfig>,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    #[serde(default)]
    pub captcha: Option<CaptchaConfig>,
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            gallery: GalleryConfig::default(),
            mail: None,
            webhook: None,
            captcha: None,
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

impl ServerConfig {
    /// Reads `path` when it exists, falls back to defaults otherwise, then
    /// applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// Overrides file values with environment variables looked up through
    /// `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup("FOLIO_BIND") {
            self.server.bind = bind
                .parse()
                .with_context(|| format!("invalid FOLIO_BIND: {bind}"))?;
        }
        if let Some(root) = lookup("GALLERY_ROOT") {
            self.gallery.root = PathBuf::from(root);
        }

        self.apply_mail_env(&lookup)?;

        if let Some(url) = lookup("DISCORD_WEBHOOK_URL") {
            match &mut self.webhook {
                Some(webhook) => webhook.url = SecretString::from(url),
                None => {
                    self.webhook = Some(WebhookConfig {
                        url: SecretString::from(url),
                        timeout_secs: default_timeout_secs(),
                    })
                }
            }
        }

        if let Some(secret) = lookup("CAPTCHA_SECRET") {
            match &mut self.captcha {
                Some(captcha) => captcha.secret = SecretString::from(secret),
                None => {
                    let mut table = toml::Table::new();
                    table.insert("secret".into(), secret.into());
                    self.captcha = Some(
                        table
                            .try_into()
                            .context("failed to build captcha config from env")?,
                    );
                }
            }
        }

        Ok(())
    }

    fn apply_mail_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        let port = lookup("SMTP_PORT")
            .map(|port| {
                port.parse::<u16>()
                    .with_context(|| format!("invalid SMTP_PORT: {port}"))
            })
            .transpose()?;

        match &mut self.mail {
            Some(mail) => {
                if let Some(host) = lookup("SMTP_HOST") {
                    mail.host = host;
                }
                if port.is_some() {
                    mail.port = port;
                }
                if let Some(user) = lookup("SMTP_USER") {
                    mail.username = user;
                }
                if let Some(password) = lookup("SMTP_PASSWORD") {
                    mail.password = SecretString::from(password);
                }
                if let Some(from) = lookup("CONTACT_FROM") {
                    mail.from = from;
                }
                if let Some(to) = lookup("CONTACT_TO") {
                    mail.to = to;
                }
            }
            None => {
                // Without a [mail] section the environment must carry the
                // whole relay configuration.
                let (Some(host), Some(user), Some(password)) = (
                    lookup("SMTP_HOST"),
                    lookup("SMTP_USER"),
                    lookup("SMTP_PASSWORD"),
                ) else {
                    return Ok(());
                };

                let mut table = toml::Table::new();
                table.insert("host".into(), host.into());
                table.insert(
                    "from".into(),
                    lookup("CONTACT_FROM").unwrap_or_else(|| user.clone()).into(),
                );
                table.insert(
                    "to".into(),
                    lookup("CONTACT_TO").unwrap_or_else(|| user.clone()).into(),
                );
                table.insert("username".into(), user.into());
                table.insert("password".into(), password.into());
                if let Some(port) = port {
                    table.insert("port".into(), i64::from(port).into());
                }

                self.mail = Some(
                    table
                        .try_into()
                        .context("failed to build mail config from env")?,
                );
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Origins allowed by CORS; empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    #[serde(default = "default_gallery_root")]
    pub root: PathBuf,
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,
}

impl GalleryConfig {
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            root: default_gallery_root(),
            freshness_secs: default_freshness_secs(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_gallery_root() -> PathBuf {
    PathBuf::from("public/photos")
}

fn default_freshness_secs() -> u64 {
    DEFAULT_FRESHNESS.as_secs()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_event_buffer_size() -> usize {
    256
}
