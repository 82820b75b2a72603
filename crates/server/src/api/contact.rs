//! 联系表单 API 路由。
//!
//! 两个表单的失败策略不同：邮件表单把中继失败报告给访客（500），
//! 机器人支持表单无论投递结果如何都返回成功。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use folio_api_types::{BotContactForm, ContactForm, MessageResponse};
use folio_core::domain::{BotContactSubmission, ContactSubmission, Delivery, DomainError};
use folio_dispatch::{Channel, DispatchEvent};
use tracing::{error, info, warn};

use super::state::AppState;

type Reply = (StatusCode, Json<MessageResponse>);

/// 创建联系表单路由。
pub fn create_contact_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route("/api/bot/contact", post(submit_bot_contact))
}

fn reply(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, Json(MessageResponse::new(message)))
}

fn invalid_body(rejection: JsonRejection) -> Reply {
    warn!(error = %rejection.body_text(), "rejected contact form body");
    reply(StatusCode::BAD_REQUEST, "Invalid request body")
}

fn missing_fields(err: DomainError) -> Reply {
    reply(
        StatusCode::BAD_REQUEST,
        format!("Missing required fields: {}", err.missing_fields().join(", ")),
    )
}

/// 邮件联系表单。
async fn submit_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Reply {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return invalid_body(rejection),
    };
    let submission =
        match ContactSubmission::new(form.name, form.email, form.subject, form.message) {
            Ok(submission) => submission,
            Err(err) => return missing_fields(err),
        };

    let submission_id = submission.id();
    match state.contact.dispatch(&submission).await {
        Ok(()) => {
            info!(submission_id = %submission_id, "contact email sent");
            state.events.emit(DispatchEvent::ContactDelivered {
                submission_id,
                channel: Channel::Email,
            });
            reply(StatusCode::OK, "Message sent successfully")
        }
        Err(err) => {
            error!(submission_id = %submission_id, error = %err, "failed to send contact email");
            state.events.emit(DispatchEvent::ContactFailed {
                submission_id,
                channel: Channel::Email,
                error: err.to_string(),
            });
            reply(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message")
        }
    }
}

/// 机器人支持表单。
async fn submit_bot_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BotContactForm>, JsonRejection>,
) -> Reply {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return invalid_body(rejection),
    };
    let submission = match BotContactSubmission::new(form.name, form.email, form.message) {
        Ok(submission) => submission,
        Err(err) => return missing_fields(err),
    };

    let submission_id = submission.id();
    match state.bot_contact.dispatch(&submission).await {
        Delivery::Delivered => {
            info!(submission_id = %submission_id, "bot contact forwarded");
            state.events.emit(DispatchEvent::ContactDelivered {
                submission_id,
                channel: Channel::Webhook,
            });
        }
        Delivery::Swallowed(err) => {
            warn!(submission_id = %submission_id, error = %err, "bot contact dispatch failed");
            state.events.emit(DispatchEvent::ContactFailed {
                submission_id,
                channel: Channel::Webhook,
                error: err.to_string(),
            });
        }
    }

    reply(StatusCode::OK, "Message sent successfully")
}
