//! Request validation and payload extraction for `POST /webhook`.

use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use github_types::{NormalizedEvent, PayloadError, is_valid_event_type};
use serde_json::Value;
use thiserror::Error;

pub const EVENT_HEADER: &str = "x-github-event";
pub const DELIVERY_HEADER: &str = "x-github-delivery";

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing event header.")]
    MissingEvent,

    #[error("Invalid event header.")]
    InvalidEvent,

    #[error("Missing content type.")]
    MissingContentType,

    #[error("Unknown content type.")]
    UnknownContentType,

    #[error("Missing payload.")]
    MissingPayload,

    #[error("Failed to decode form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing repository information.")]
    MissingRepository,

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// One accepted webhook delivery.
#[derive(Debug)]
pub struct Delivery {
    /// `X-GitHub-Delivery`, `"unknown"` when absent.
    pub id: String,
    /// Full name used for routing (`owner/repo`, or `org/repositories` for
    /// organisation hooks).
    pub repository: String,
    pub event: NormalizedEvent,
}

/// Validates headers, decodes the body and normalizes the payload.
pub fn parse(headers: &HeaderMap, body: &[u8]) -> Result<Delivery, IngestError> {
    let event_type = headers
        .get(EVENT_HEADER)
        .ok_or(IngestError::MissingEvent)?
        .to_str()
        .map_err(|_| IngestError::InvalidEvent)?;
    if !is_valid_event_type(event_type) {
        return Err(IngestError::InvalidEvent);
    }

    let id = headers
        .get(DELIVERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned();

    let payload = decode_body(headers, body)?;
    let event = NormalizedEvent::new(event_type, payload)?;
    let repository = event
        .full_repository_name()
        .ok_or(IngestError::MissingRepository)?;

    Ok(Delivery {
        id,
        repository,
        event,
    })
}

fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, IngestError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or(IngestError::MissingContentType)?
        .to_str()
        .map_err(|_| IngestError::UnknownContentType)?;
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        JSON => Ok(serde_json::from_slice(body)?),
        FORM => {
            let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
            let raw = fields
                .into_iter()
                .find_map(|(key, value)| (key == "payload").then_some(value))
                .ok_or(IngestError::MissingPayload)?;
            Ok(serde_json::from_str(&raw)?)
        }
        _ => Err(IngestError::UnknownContentType),
    }
}
