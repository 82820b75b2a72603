use std::sync::Arc;

use anyhow::Context;
use folio_dispatch::{DispatchEvent, EventStream};
use folio_server::api::{self, AppState};
use folio_server::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting folio server");
    let config_path =
        std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    info!(path = %config_path, "loading server config");
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("failed to load server config from {config_path}"))?;

    let state = Arc::new(
        AppState::from_config(&config).context("failed to initialize application state")?,
    );
    if config.mail.is_none() {
        warn!("no [mail] configuration, contact form will answer 500");
    }
    if config.webhook.is_none() {
        warn!("no [webhook] configuration, bot contact messages will be dropped");
    }

    tokio::spawn(log_dispatch_events(state.events.subscribe()));
    info!("subscribed to dispatch event stream");

    let app = api::create_router(state).layer(
        api::cors_layer(&config.server.allowed_origins).context("invalid CORS configuration")?,
    );
    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    info!(addr = %config.server.bind, "server is ready, press Ctrl+C to shut down");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn log_dispatch_events(mut events: EventStream) {
    loop {
        match events.recv().await {
            Ok(DispatchEvent::ContactDelivered {
                submission_id,
                channel,
            }) => info!(%submission_id, ?channel, "contact delivered"),
            Ok(DispatchEvent::ContactFailed {
                submission_id,
                channel,
                error,
            }) => warn!(%submission_id, ?channel, %error, "contact delivery failed"),
            Ok(DispatchEvent::CaptchaUnavailable { error }) => {
                warn!(%error, "captcha provider unavailable")
            }
            Err(err) => match err.downcast_ref::<RecvError>() {
                Some(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dispatch event stream lagged");
                }
                _ => {
                    warn!(error = %err, "failed to receive dispatch event");
                    break;
                }
            },
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
