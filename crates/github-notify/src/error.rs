//! Conversion outcomes other than a rendered notification

use github_types::PayloadError;
use thiserror::Error;

/// Why an event produced no notification.
///
/// Callers must tell the three apart: [`ConvertError::Ignored`] is not a
/// failure, [`ConvertError::NotImplemented`] points at a gap in the action
/// table, [`ConvertError::Validation`] is a malformed request.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Spammy event type, or an action deliberately skipped (`"issues - labeled"`).
    #[error("Event type \"{0}\" is ignored by design due to spammy nature of the event.")]
    Ignored(String),

    #[error("{}", not_implemented_message(.event, .action.as_deref()))]
    NotImplemented {
        event: String,
        action: Option<String>,
    },

    #[error(transparent)]
    Validation(#[from] PayloadError),
}

impl ConvertError {
    pub fn not_implemented(event: impl Into<String>, action: Option<&str>) -> Self {
        Self::NotImplemented {
            event: event.into(),
            action: action.map(str::to_owned),
        }
    }

    pub fn missing_field(event: impl Into<String>, field: &'static str) -> Self {
        Self::Validation(PayloadError::MissingField {
            event: event.into(),
            field,
        })
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

fn not_implemented_message(event: &str, action: Option<&str>) -> String {
    match action {
        Some(action) => format!("Unsupported action type \"{action}\" in event type \"{event}\"."),
        None => format!("Unsupported event type \"{event}\"."),
    }
}
