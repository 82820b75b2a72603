mod contact;
mod dispatch;
mod error;
mod flow;
mod ids;
mod subscriber;

pub use contact::{BotContactSubmission, ContactSubmission};
pub use dispatch::{
    CaptchaVerifier, DispatchError, MailTransport, OutboundEmail, WebhookField, WebhookMessage,
    WebhookSink,
};
pub use error::DomainError;
pub use flow::{BestEffortFlow, Delivery, ReportFailureFlow, WEBHOOK_FIELD_MAX_CHARS};
pub use ids::SubmissionId;
pub use subscriber::LastSubscriber;
