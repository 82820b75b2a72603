//! API 路由模块。

pub mod captcha;
pub mod contact;
pub mod error;
pub mod gallery;
pub mod state;
pub mod subscriber;
pub mod ws;

use std::sync::Arc;

use anyhow::Context;
use axum::{Json, Router, http::HeaderValue, routing::get};
use folio_api_types::HealthCheckResponse;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use captcha::create_captcha_router;
pub use contact::create_contact_router;
pub use error::ApiError;
pub use gallery::create_gallery_router;
pub use state::{Adapters, AppState};
pub use subscriber::{SubscriberBoard, create_subscriber_router};

/// 组装全部路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(create_gallery_router())
        .merge(create_contact_router())
        .merge(create_captcha_router())
        .merge(create_subscriber_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 跨域策略。`allowed_origins` 为空时允许任意来源。
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

async fn health() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::ok())
}
