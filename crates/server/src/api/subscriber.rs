//! 直播叠加层的最近订阅者 API 路由。
//!
//! 记录仅保存在内存中，每次 POST 整体替换，进程重启后丢失。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use folio_api_types::{LastSubscriberResponse, LastSubscriberUpdate};
use folio_core::domain::LastSubscriber;
use tokio::sync::{RwLock, broadcast};
use tracing::info;

use super::error::ApiError;
use super::state::AppState;
use super::ws::overlay_websocket;

/// 最近订阅者记录及其变更广播。
pub struct SubscriberBoard {
    current: RwLock<Option<LastSubscriber>>,
    updates: broadcast::Sender<LastSubscriber>,
}

impl SubscriberBoard {
    /// 创建空记录。`capacity` 为变更广播队列容量。
    pub fn new(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity.max(1));
        Self {
            current: RwLock::new(None),
            updates,
        }
    }

    /// 当前记录。
    pub async fn current(&self) -> Option<LastSubscriber> {
        self.current.read().await.clone()
    }

    /// 整体替换记录并通知订阅方。
    pub async fn replace(&self, record: LastSubscriber) {
        *self.current.write().await = Some(record.clone());
        let _ = self.updates.send(record);
    }

    /// 订阅后续变更。
    pub fn subscribe(&self) -> broadcast::Receiver<LastSubscriber> {
        self.updates.subscribe()
    }
}

/// 创建订阅者路由。
pub fn create_subscriber_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/twitch/last-subscriber",
            get(get_last_subscriber).post(update_last_subscriber),
        )
        .route("/api/twitch/overlay/ws", get(overlay_websocket))
}

pub fn to_response(record: &LastSubscriber) -> LastSubscriberResponse {
    LastSubscriberResponse {
        username: record.username().to_string(),
        timestamp: record.timestamp_ms(),
    }
}

/// 读取最近订阅者；尚无记录时返回 `null`。
async fn get_last_subscriber(
    State(state): State<Arc<AppState>>,
) -> Json<Option<LastSubscriberResponse>> {
    Json(state.subscribers.current().await.as_ref().map(to_response))
}

/// 替换最近订阅者。缺省时间戳取服务端当前时间。
async fn update_last_subscriber(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LastSubscriberUpdate>, JsonRejection>,
) -> Result<Json<LastSubscriberResponse>, ApiError> {
    let Json(update) = payload?;
    let timestamp = update
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let record = LastSubscriber::new(update.username, timestamp)?;

    info!(username = %record.username(), timestamp, "last subscriber updated");
    let response = to_response(&record);
    state.subscribers.replace(record).await;

    Ok(Json(response))
}
