//! 验证码校验实现。
//!
//! reCAPTCHA、hCaptcha 与 Turnstile 的 siteverify 接口形状一致：
//! 表单提交 `secret`、`response`、`remoteip`，返回 `{ success, error-codes }`。

use std::net::IpAddr;

use async_trait::async_trait;
use folio_core::domain::{CaptchaVerifier, DispatchError};
use reqwest::Client;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CaptchaConfig;

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// siteverify 协议的验证码校验器。
pub struct SiteVerifyCaptcha {
    client: Client,
    secret: SecretString,
    verify_url: String,
}

impl SiteVerifyCaptcha {
    pub fn new(config: &CaptchaConfig) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
        })
    }
}

#[async_trait]
impl CaptchaVerifier for SiteVerifyCaptcha {
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> Result<bool, DispatchError> {
        let mut form = vec![
            ("secret", self.secret.expose_secret().to_string()),
            ("response", token.to_string()),
        ];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip.to_string()));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
            });
        }

        let verdict: SiteVerifyResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        if verdict.success {
            info!("captcha token verified");
        } else {
            debug!(error_codes = ?verdict.error_codes, "captcha token rejected");
        }
        Ok(verdict.success)
    }
}
