//! 直播叠加层 WebSocket。
//!
//! 连接建立后先推送当前记录（如有），之后每次替换推送一帧 JSON 文本。
//! 客户端消息除 `Close` 外一律忽略。

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use super::state::AppState;
use super::subscriber::to_response;
use folio_core::domain::LastSubscriber;

/// Axum WebSocket 升级 handler。
pub async fn overlay_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    info!("new overlay WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // 先订阅再读取当前值，避免漏掉中间的替换
    let updates = state.subscribers.subscribe();
    let initial = state.subscribers.current().await;
    info!("overlay WebSocket connection established");

    let writer_task = tokio::spawn(async move {
        push_updates(&mut sender, initial, updates).await;
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "overlay WebSocket receive error");
                break;
            }
        }
    }

    writer_task.abort();
    info!("overlay WebSocket connection closed");
}

/// 先推送初始记录，再逐条推送后续替换，直到发送失败或广播关闭。
async fn push_updates<S>(
    sender: &mut S,
    initial: Option<LastSubscriber>,
    mut updates: broadcast::Receiver<LastSubscriber>,
) where
    S: Sink<Message> + Unpin,
{
    if let Some(record) = initial
        && send_record(sender, &record).await.is_err()
    {
        return;
    }

    loop {
        match updates.recv().await {
            Ok(record) => {
                if send_record(sender, &record).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "overlay WebSocket lagged behind subscriber updates");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_record<S>(sender: &mut S, record: &LastSubscriber) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(&to_response(record)) {
        Ok(json) => json,
        Err(err) => {
            error!(error = %err, "failed to serialize subscriber record");
            return Err(());
        }
    };

    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}
