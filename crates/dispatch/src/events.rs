use anyhow::Result;
use folio_core::domain::SubmissionId;
use tokio::sync::broadcast;

/// 外发渠道。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// SMTP 邮件。
    Email,
    /// 聊天 Webhook。
    Webhook,
}

/// 外发结果事件，供日志与运维订阅。
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// 投递成功。
    ContactDelivered {
        /// 提交 ID。
        submission_id: SubmissionId,
        /// 投递渠道。
        channel: Channel,
    },
    /// 投递失败（无论是否告知访客）。
    ContactFailed {
        /// 提交 ID。
        submission_id: SubmissionId,
        /// 投递渠道。
        channel: Channel,
        /// 错误描述。
        error: String,
    },
    /// 验证码服务不可用，已按未通过处理。
    CaptchaUnavailable {
        /// 错误描述。
        error: String,
    },
}

/// 基于 `tokio::broadcast` 的事件广播器。
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<DispatchEvent>,
}

impl EventBroadcaster {
    /// 创建事件广播器。
    ///
    /// `capacity` 表示内部广播队列容量，至少为 1。
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 广播一个事件。没有订阅者时直接丢弃。
    pub fn emit(&self, event: DispatchEvent) {
        let _ = self.sender.send(event);
    }

    /// 订阅事件流。
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

/// 事件接收流包装器。
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<DispatchEvent>,
}

impl EventStream {
    /// 异步接收下一条事件。
    pub async fn recv(&mut self) -> Result<DispatchEvent> {
        Ok(self.receiver.recv().await?)
    }

    /// 非阻塞尝试接收一条事件。
    pub fn try_recv(&mut self) -> Result<DispatchEvent> {
        Ok(self.receiver.try_recv()?)
    }
}
