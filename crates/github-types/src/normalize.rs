//! Payload normalization.
//!
//! GitHub does not always send the derived fields downstream code relies on.
//! [`NormalizedEvent::new`] fills them in once, in place, before anything
//! else looks at the payload:
//!
//! - `ref_name` / `base_ref_name` from `ref` / `base_ref` (`refs/heads/x` -> `x`)
//! - a placeholder `repository` for organisation-level hooks

use serde_json::{Map, Value, json};

use crate::error::{PayloadError, Result};

/// Event type header plus its decoded, normalized payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    event_type: String,
    payload: Value,
}

impl NormalizedEvent {
    /// Validates the event type and normalizes the payload.
    ///
    /// Any JSON value is accepted; only objects are normalized. Required
    /// fields are checked later, when the typed event is decoded.
    pub fn new(event_type: impl Into<String>, mut payload: Value) -> Result<Self> {
        let event_type = event_type.into();
        if !is_valid_event_type(&event_type) {
            return Err(PayloadError::InvalidEventType(event_type));
        }

        if let Some(object) = payload.as_object_mut() {
            normalize(object);
        }

        Ok(Self {
            event_type,
            payload,
        })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Raw `action` field, when the event has one.
    pub fn action(&self) -> Option<&str> {
        self.str_at("/action")
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Looks up a value by JSON pointer (`/pull_request/merged`).
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        self.payload.pointer(pointer)
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.get(pointer).and_then(Value::as_str)
    }

    pub fn bool_at(&self, pointer: &str) -> Option<bool> {
        self.get(pointer).and_then(Value::as_bool)
    }

    /// `owner/name` of the repository, if the payload has one.
    pub fn full_repository_name(&self) -> Option<String> {
        if let Some(full_name) = self.str_at("/repository/full_name") {
            return Some(full_name.to_string());
        }
        let name = self.str_at("/repository/name")?;
        let owner = self
            .str_at("/repository/owner/name")
            .or_else(|| self.str_at("/repository/owner/login"))?;
        Some(format!("{owner}/{name}"))
    }
}

/// `^[a-z_]+$`
pub fn is_valid_event_type(event_type: &str) -> bool {
    !event_type.is_empty()
        && event_type
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b == b'_')
}

/// Everything after the first two path segments of a git ref.
///
/// `refs/heads/feature/x` -> `feature/x`, `refs/tags/v1` -> `v1`.
pub fn ref_name(reference: &str) -> Option<&str> {
    reference.splitn(3, '/').nth(2)
}

fn normalize(object: &mut Map<String, Value>) {
    derive_ref_name(object, "ref", "ref_name");
    derive_ref_name(object, "base_ref", "base_ref_name");

    if !object.contains_key("repository")
        && let Some(login) = object
            .get("organization")
            .and_then(|org| org.get("login"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    {
        tracing::debug!(organization = %login, "Synthesising repository for organisation event");
        object.insert(
            "repository".to_string(),
            json!({
                "full_name": format!("{login}/repositories"),
                "name": format!("org: {login}"),
                "owner": { "name": login, "login": login },
            }),
        );
    }
}

fn derive_ref_name(object: &mut Map<String, Value>, source: &str, target: &str) {
    if object.get(target).is_some_and(|v| !v.is_null()) {
        return;
    }
    let Some(name) = object
        .get(source)
        .and_then(Value::as_str)
        .and_then(ref_name)
        .map(str::to_owned)
    else {
        return;
    };
    object.insert(target.to_string(), Value::String(name));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_name_strips_heads_prefix() {
        assert_eq!(ref_name("refs/heads/foo/bar"), Some("foo/bar"));
    }

    #[test]
    fn test_ref_name_strips_tags_prefix() {
        assert_eq!(ref_name("refs/tags/v1"), Some("v1"));
    }

    #[test]
    fn test_ref_name_requires_three_segments() {
        assert_eq!(ref_name("main"), None);
        assert_eq!(ref_name("refs/heads"), None);
    }

    #[test]
    fn test_event_type_validation() {
        assert!(is_valid_event_type("pull_request_review"));
        assert!(!is_valid_event_type(""));
        assert!(!is_valid_event_type("Push"));
        assert!(!is_valid_event_type("push-event"));
        assert!(!is_valid_event_type("../etc"));
    }

    #[test]
    fn test_new_rejects_invalid_event_type() {
        let err = NormalizedEvent::new("PUSH", json!({})).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidEventType(t) if t == "PUSH"));
    }

    #[test]
    fn test_new_accepts_null_payload() {
        let event = NormalizedEvent::new("fork", Value::Null).unwrap();
        assert_eq!(event.event_type(), "fork");
        assert_eq!(event.action(), None);
    }

    #[test]
    fn test_derives_ref_names() {
        let event = NormalizedEvent::new(
            "push",
            json!({ "ref": "refs/heads/feature/x", "base_ref": "refs/heads/main" }),
        )
        .unwrap();
        assert_eq!(event.str_at("/ref_name"), Some("feature/x"));
        assert_eq!(event.str_at("/base_ref_name"), Some("main"));
    }

    #[test]
    fn test_keeps_existing_ref_name() {
        let event = NormalizedEvent::new(
            "push",
            json!({ "ref": "refs/heads/main", "ref_name": "custom" }),
        )
        .unwrap();
        assert_eq!(event.str_at("/ref_name"), Some("custom"));
    }

    #[test]
    fn test_null_base_ref_gets_no_name() {
        let event = NormalizedEvent::new(
            "push",
            json!({ "ref": "refs/heads/main", "base_ref": null }),
        )
        .unwrap();
        assert_eq!(event.get("/base_ref_name"), None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = NormalizedEvent::new(
            "push",
            json!({ "ref": "refs/tags/v2.0", "organization": { "login": "acme" } }),
        )
        .unwrap();
        let twice = NormalizedEvent::new("push", once.payload().clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_synthesises_organisation_repository() {
        let event = NormalizedEvent::new(
            "member",
            json!({ "action": "added", "organization": { "login": "acme" } }),
        )
        .unwrap();
        assert_eq!(event.str_at("/repository/full_name"), Some("acme/repositories"));
        assert_eq!(event.str_at("/repository/name"), Some("org: acme"));
        assert_eq!(event.str_at("/repository/owner/login"), Some("acme"));
        assert_eq!(event.full_repository_name().as_deref(), Some("acme/repositories"));
    }

    #[test]
    fn test_existing_repository_is_not_replaced() {
        let event = NormalizedEvent::new(
            "issues",
            json!({
                "repository": { "name": "r", "full_name": "o/r" },
                "organization": { "login": "o" }
            }),
        )
        .unwrap();
        assert_eq!(event.full_repository_name().as_deref(), Some("o/r"));
    }

    #[test]
    fn test_full_repository_name_from_owner() {
        let event = NormalizedEvent::new(
            "push",
            json!({ "repository": { "name": "r", "owner": { "name": "o" } } }),
        )
        .unwrap();
        assert_eq!(event.full_repository_name().as_deref(), Some("o/r"));
    }

    #[test]
    fn test_missing_repository_information() {
        let event = NormalizedEvent::new("issues", json!({ "action": "opened" })).unwrap();
        assert_eq!(event.full_repository_name(), None);
    }
}
