use std::net::IpAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use folio_core::domain::{
    CaptchaVerifier, DispatchError, MailTransport, OutboundEmail, WebhookMessage, WebhookSink,
};
use folio_gallery::{DEFAULT_FRESHNESS, FsReader, Gallery, PathSanitizer};
use folio_server::api::{Adapters, AppState, create_router};
use tower::ServiceExt as _;

/// Mail transport that records every email and optionally fails.
#[derive(Default)]
pub struct RecordingMail {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub fail: bool,
}

#[async_trait]
impl MailTransport for RecordingMail {
    async fn send(&self, email: OutboundEmail) -> Result<(), DispatchError> {
        self.sent.lock().expect("sent lock").push(email);
        if self.fail {
            return Err(DispatchError::Transport("relay unreachable".to_string()));
        }
        Ok(())
    }
}

/// Webhook sink that records every message and optionally fails.
#[derive(Default)]
pub struct RecordingWebhook {
    pub posted: Mutex<Vec<WebhookMessage>>,
    pub fail: bool,
}

#[async_trait]
impl WebhookSink for RecordingWebhook {
    async fn post(&self, message: WebhookMessage) -> Result<(), DispatchError> {
        self.posted.lock().expect("posted lock").push(message);
        if self.fail {
            return Err(DispatchError::Rejected { status: 502 });
        }
        Ok(())
    }
}

/// Captcha verifier with a fixed answer.
pub enum StubCaptcha {
    Verdict(bool),
    Unreachable,
}

#[async_trait]
impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str, _remote_ip: Option<IpAddr>) -> Result<bool, DispatchError> {
        match self {
            Self::Verdict(verdict) => Ok(*verdict && !token.is_empty()),
            Self::Unreachable => Err(DispatchError::Transport("timed out".to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub mail: Arc<RecordingMail>,
    pub webhook: Arc<RecordingWebhook>,
}

impl TestApp {
    pub fn new(
        root: &Path,
        mail: RecordingMail,
        webhook: RecordingWebhook,
        captcha: StubCaptcha,
    ) -> Self {
        let mail = Arc::new(mail);
        let webhook = Arc::new(webhook);
        let gallery = Gallery::new(
            PathSanitizer::new(root).expect("gallery root"),
            Arc::new(FsReader),
            DEFAULT_FRESHNESS,
        );
        let adapters = Adapters {
            mail: mail.clone(),
            webhook: webhook.clone(),
            captcha: Arc::new(captcha),
        };
        let state = Arc::new(AppState::new(gallery, adapters, "[test]", 16));

        Self {
            router: create_router(state.clone()),
            state,
            mail,
            webhook,
        }
    }

    pub fn with_defaults(root: &Path) -> Self {
        Self::new(
            root,
            RecordingMail::default(),
            RecordingWebhook::default(),
            StubCaptcha::Verdict(true),
        )
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::get(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
