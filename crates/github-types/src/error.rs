//! Error types for github-types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PayloadError>;

/// Reasons a webhook payload cannot be turned into a typed event.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid event type \"{0}\": expected lowercase letters and underscores")]
    InvalidEventType(String),

    #[error("No payload model for event type \"{0}\"")]
    UnknownEvent(String),

    #[error("Invalid \"{event}\" payload: {source}")]
    Invalid {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing field \"{field}\" in \"{event}\" payload")]
    MissingField { event: String, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_type_display() {
        let err = PayloadError::InvalidEventType("Push".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid event type \"Push\": expected lowercase letters and underscores"
        );
    }

    #[test]
    fn test_invalid_payload_keeps_serde_source() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = PayloadError::Invalid {
            event: "issues".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid \"issues\" payload:"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_field_display() {
        let err = PayloadError::MissingField {
            event: "pull_request_review".to_string(),
            field: "review.state",
        };
        assert_eq!(
            err.to_string(),
            "Missing field \"review.state\" in \"pull_request_review\" payload"
        );
    }
}
