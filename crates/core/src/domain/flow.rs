//! The two contact dispatch policies.
//!
//! They are intentionally not unified: the email form tells the visitor when
//! the relay failed, the bot support form never does.

use std::sync::Arc;

use super::{
    BotContactSubmission, ContactSubmission, DispatchError, MailTransport, OutboundEmail,
    WebhookField, WebhookMessage, WebhookSink,
};

/// Discord rejects embed field values longer than this.
pub const WEBHOOK_FIELD_MAX_CHARS: usize = 1024;

/// Sends one email per submission and reports relay failures to the caller.
#[derive(Clone)]
pub struct ReportFailureFlow {
    transport: Arc<dyn MailTransport>,
    subject_prefix: String,
}

impl ReportFailureFlow {
    pub fn new(transport: Arc<dyn MailTransport>, subject_prefix: impl Into<String>) -> Self {
        Self {
            transport,
            subject_prefix: subject_prefix.into(),
        }
    }

    pub fn compose(&self, submission: &ContactSubmission) -> OutboundEmail {
        let subject = if self.subject_prefix.is_empty() {
            submission.subject().to_string()
        } else {
            format!("{} {}", self.subject_prefix, submission.subject())
        };

        OutboundEmail {
            reply_to: submission.email().to_string(),
            reply_to_name: submission.name().to_string(),
            subject,
            body: format!(
                "Name: {}\nEmail: {}\n\n{}",
                submission.name(),
                submission.email(),
                submission.message()
            ),
        }
    }

    pub async fn dispatch(&self, submission: &ContactSubmission) -> Result<(), DispatchError> {
        self.transport.send(self.compose(submission)).await
    }
}

/// Outcome of a best-effort dispatch. Both variants mean "success" to the
/// visitor; the error is kept only for logging.
#[derive(Debug)]
pub enum Delivery {
    Delivered,
    Swallowed(DispatchError),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Posts one webhook message per submission and never surfaces failures.
#[derive(Clone)]
pub struct BestEffortFlow {
    sink: Arc<dyn WebhookSink>,
}

impl BestEffortFlow {
    pub fn new(sink: Arc<dyn WebhookSink>) -> Self {
        Self { sink }
    }

    pub fn format(submission: &BotContactSubmission) -> WebhookMessage {
        let field = |name: &str, value: &str| WebhookField {
            name: name.to_string(),
            value: truncate_chars(value, WEBHOOK_FIELD_MAX_CHARS),
        };

        WebhookMessage {
            title: "New contact message".to_string(),
            fields: vec![
                field("Name", submission.name()),
                field("Email", submission.email()),
                field("Message", submission.message()),
            ],
        }
    }

    pub async fn dispatch(&self, submission: &BotContactSubmission) -> Delivery {
        match self.sink.post(Self::format(submission)).await {
            Ok(()) => Delivery::Delivered,
            Err(err) => Delivery::Swallowed(err),
        }
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
