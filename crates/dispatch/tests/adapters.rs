#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Form, Json, State};
use axum::http::StatusCode;
use axum::routing::post;
use folio_core::domain::{
    CaptchaVerifier, DispatchError, WebhookField, WebhookMessage, WebhookSink,
};
use folio_dispatch::{CaptchaConfig, DiscordWebhook, SiteVerifyCaptcha, WebhookConfig};
use secrecy::SecretString;

type Seen = Arc<Mutex<Vec<serde_json::Value>>>;

/// Serves `router` on an ephemeral local port and returns its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn message() -> WebhookMessage {
    WebhookMessage {
        title: "New contact message".to_string(),
        fields: vec![
            WebhookField {
                name: "Name".to_string(),
                value: "A".to_string(),
            },
            WebhookField {
                name: "Message".to_string(),
                value: "hello".to_string(),
            },
        ],
    }
}

fn webhook_config(url: String) -> WebhookConfig {
    WebhookConfig {
        url: SecretString::from(url),
        timeout_secs: 5,
    }
}

fn captcha_config(verify_url: String) -> CaptchaConfig {
    CaptchaConfig {
        secret: SecretString::from("captcha-secret"),
        verify_url,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn webhook_posts_embed_json() {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route(
            "/hook",
            post(
                |State(seen): State<Seen>, Json(body): Json<serde_json::Value>| async move {
                    seen.lock().unwrap().push(body);
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(seen.clone());
    let addr = serve(router).await;

    let webhook = DiscordWebhook::new(&webhook_config(format!("http://{addr}/hook"))).unwrap();
    webhook.post(message()).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["embeds"][0]["fields"][1]["value"], "hello");
}

#[tokio::test]
async fn webhook_non_success_status_is_rejected() {
    let router = Router::new().route("/hook", post(|| async { StatusCode::TOO_MANY_REQUESTS }));
    let addr = serve(router).await;

    let webhook = DiscordWebhook::new(&webhook_config(format!("http://{addr}/hook"))).unwrap();
    let err = webhook.post(message()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Rejected { status: 429 }));
}

#[tokio::test]
async fn webhook_unreachable_is_transport_error_without_token() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let webhook =
        DiscordWebhook::new(&webhook_config(format!("http://{addr}/hook/secret-token"))).unwrap();
    let err = webhook.post(message()).await.unwrap_err();

    assert!(matches!(err, DispatchError::Transport(_)));
    assert!(!err.to_string().contains("secret-token"));
}

#[tokio::test]
async fn captcha_forwards_secret_token_and_ip() {
    let seen: Arc<Mutex<Vec<Vec<(String, String)>>>> = Arc::default();
    let router = Router::new()
        .route(
            "/siteverify",
            post(
                |State(seen): State<Arc<Mutex<Vec<Vec<(String, String)>>>>>,
                 Form(form): Form<Vec<(String, String)>>| async move {
                    let ok = form.iter().any(|(k, v)| k == "response" && v == "good");
                    seen.lock().unwrap().push(form);
                    Json(serde_json::json!({ "success": ok, "error-codes": [] }))
                },
            ),
        )
        .with_state(seen.clone());
    let addr = serve(router).await;

    let captcha =
        SiteVerifyCaptcha::new(&captcha_config(format!("http://{addr}/siteverify"))).unwrap();
    let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

    assert!(captcha.verify("good", Some(ip)).await.unwrap());
    assert!(!captcha.verify("bad", None).await.unwrap());

    let seen = seen.lock().unwrap();
    assert!(seen[0].contains(&("secret".to_string(), "captcha-secret".to_string())));
    assert!(seen[0].contains(&("remoteip".to_string(), "203.0.113.7".to_string())));
    assert!(!seen[1].iter().any(|(k, _)| k == "remoteip"));
}

#[tokio::test]
async fn captcha_malformed_reply_is_an_error() {
    let router = Router::new().route("/siteverify", post(|| async { "not json" }));
    let addr = serve(router).await;

    let captcha =
        SiteVerifyCaptcha::new(&captcha_config(format!("http://{addr}/siteverify"))).unwrap();
    let err = captcha.verify("token", None).await.unwrap_err();

    assert!(matches!(err, DispatchError::MalformedResponse(_)));
}
