use super::{DomainError, SubmissionId};

/// Trims `value` and returns it when something is left, recording `field`
/// as missing otherwise.
fn required(
    field: &'static str,
    value: Option<String>,
    missing: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

/// A validated submission of the email contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    id: SubmissionId,
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactSubmission {
    pub const FIELDS: [&'static str; 4] = ["name", "email", "subject", "message"];

    pub fn new(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut missing = Vec::new();
        let name = required("name", name, &mut missing);
        let email = required("email", email, &mut missing);
        let subject = required("subject", subject, &mut missing);
        let message = required("message", message, &mut missing);

        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        Ok(Self {
            id: SubmissionId::new(),
            name,
            email,
            subject,
            message,
        })
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A validated submission of the bot support form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotContactSubmission {
    id: SubmissionId,
    name: String,
    email: String,
    message: String,
}

impl BotContactSubmission {
    pub const FIELDS: [&'static str; 3] = ["name", "email", "message"];

    pub fn new(
        name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut missing = Vec::new();
        let name = required("name", name, &mut missing);
        let email = required("email", email, &mut missing);
        let message = required("message", message, &mut missing);

        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        Ok(Self {
            id: SubmissionId::new(),
            name,
            email,
            message,
        })
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
