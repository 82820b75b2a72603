use super::DomainError;

/// The most recent channel subscriber shown by the stream overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSubscriber {
    username: String,
    timestamp_ms: i64,
}

impl LastSubscriber {
    pub fn new(username: Option<String>, timestamp_ms: i64) -> Result<Self, DomainError> {
        match username {
            Some(username) if !username.trim().is_empty() => Ok(Self {
                username: username.trim().to_string(),
                timestamp_ms,
            }),
            _ => Err(DomainError::MissingFields(vec!["username"])),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }
}
