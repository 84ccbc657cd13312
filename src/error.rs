use thiserror::Error;

use crate::constants::{MSG_ALL_FIELDS_REQUIRED, MSG_INVALID_EMAIL, MSG_SUBMISSION_FAILED};

/// Client-correctable problems with a submission. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Funding goals must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

impl ValidationError {
    /// Message returned verbatim to the submitter.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField(_) => MSG_ALL_FIELDS_REQUIRED.to_string(),
            ValidationError::InvalidEmailFormat => MSG_INVALID_EMAIL.to_string(),
            ValidationError::FieldTooLong { .. } => self.to_string(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidEmailFormat => "invalid_email_format",
            ValidationError::FieldTooLong { .. } => "field_too_long",
        }
    }
}

/// Downstream delivery failures. Not user-correctable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink call timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("sink rejected record: {0}")]
    Rejected(String),
}

impl SinkError {
    /// Timeouts and transport failures may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, SinkError::Timeout { .. } | SinkError::Unavailable(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SinkError::Timeout { .. } => "timeout",
            SinkError::Unavailable(_) => "unavailable",
            SinkError::Rejected(_) => "rejected",
        }
    }
}

/// Everything a contact request can fail with.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("unexpected intake failure: {0}")]
    Unexpected(String),
}

impl IntakeError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, IntakeError::Validation(_))
    }

    /// Message safe to show the submitter. Sink and internal detail stays server-side.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Validation(e) => e.user_message(),
            IntakeError::Sink(_) | IntakeError::Unexpected(_) => MSG_SUBMISSION_FAILED.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Sink '{0}' requires sink_endpoint to be set")]
    MissingEndpoint(&'static str),
}

pub type Result<T> = std::result::Result<T, IntakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_errors_never_leak_to_user_message() {
        let err = IntakeError::Sink(SinkError::Unavailable("smtp.internal:25 refused".into()));
        assert_eq!(err.user_message(), MSG_SUBMISSION_FAILED);
        assert!(!err.is_client_error());
    }

    #[test]
    fn validation_messages_are_surfaced_verbatim() {
        let missing = IntakeError::from(ValidationError::MissingField(vec!["email"]));
        assert_eq!(missing.user_message(), "All fields are required");

        let email = IntakeError::from(ValidationError::InvalidEmailFormat);
        assert_eq!(email.user_message(), "Invalid email format");

        let long = ValidationError::FieldTooLong { field: "fundingGoals", max: 10 };
        assert_eq!(long.user_message(), "Funding goals must be at most 10 characters");
    }

    #[test]
    fn only_timeouts_and_outages_are_transient() {
        assert!(SinkError::Timeout { after_ms: 10 }.is_transient());
        assert!(SinkError::Unavailable("down".into()).is_transient());
        assert!(!SinkError::Rejected("bad".into()).is_transient());
    }
}
