//! 验证码校验 API 路由。

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    routing::post,
};
use folio_api_types::{CaptchaVerifyRequest, CaptchaVerifyResponse};
use folio_core::domain::DomainError;
use folio_dispatch::DispatchEvent;
use tracing::warn;

use super::error::ApiError;
use super::state::AppState;

/// 创建验证码路由。
pub fn create_captcha_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/captcha/verify", post(verify_captcha))
}

/// 校验验证码。服务不可用时按未通过处理，而不是报错。
async fn verify_captcha(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CaptchaVerifyRequest>, JsonRejection>,
) -> Result<Json<CaptchaVerifyResponse>, ApiError> {
    let Json(request) = payload?;
    let token = match request.token {
        Some(token) if !token.trim().is_empty() => token,
        _ => return Err(DomainError::MissingFields(vec!["token"]).into()),
    };

    let success = match state.captcha.verify(&token, client_ip(&headers)).await {
        Ok(success) => success,
        Err(err) => {
            warn!(error = %err, "captcha verification unavailable, failing neutral");
            state.events.emit(DispatchEvent::CaptchaUnavailable {
                error: err.to_string(),
            });
            false
        }
    };

    Ok(Json(CaptchaVerifyResponse { success }))
}

/// 反向代理头中的客户端地址。
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next());
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok());

    forwarded
        .or(real_ip)
        .and_then(|value| value.trim().parse().ok())
}
