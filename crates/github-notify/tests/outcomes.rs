//! Ignored, unsupported and malformed deliveries, checked against both
//! renderers: none of them may produce output.

mod common;

use github_notify::policy::{ActionSource, policies};
use github_notify::{ConvertError, DiscordRenderer, IrcRenderer, Renderer, convert};
use github_types::PayloadError;
use serde_json::{Value, json};

const UNKNOWN_ACTION: &str = "surely_this_action_does_not_exist";

// ── Helpers ───────────────────────────────────────────────────────────────────

fn failure<R: Renderer>(renderer: &R, event: &str, payload: Value) -> ConvertError {
    match convert(renderer, event, payload) {
        Ok(_) => panic!("{event} unexpectedly rendered"),
        Err(err) => err,
    }
}

fn for_both(event: &str, payload: Value, check: impl Fn(ConvertError)) {
    check(failure(&IrcRenderer, event, payload.clone()));
    check(failure(&DiscordRenderer, event, payload));
}

fn assert_ignored(event: &str, payload: Value, reason: &str) {
    for_both(event, payload, |err| match err {
        ConvertError::Ignored(got) => assert_eq!(got, reason),
        other => panic!("{event}: expected ignored, got {other}"),
    });
}

fn assert_not_implemented(event: &str, payload: Value, action: Option<&str>) {
    for_both(event, payload, |err| match err {
        ConvertError::NotImplemented {
            event: got_event,
            action: got_action,
        } => {
            assert_eq!(got_event, event);
            assert_eq!(got_action.as_deref(), action);
        }
        other => panic!("{event}: expected not implemented, got {other}"),
    });
}

// ── Ignored ───────────────────────────────────────────────────────────────────

#[test]
fn spammy_event_types_are_ignored_whatever_the_payload() {
    for event in ["fork", "watch", "star", "status"] {
        assert_ignored(event, Value::Null, event);
        assert_ignored(event, json!({ "action": "started" }), event);
    }
}

#[test]
fn ignored_event_message() {
    let err = failure(&IrcRenderer, "fork", Value::Null);
    assert_eq!(
        err.to_string(),
        "Event type \"fork\" is ignored by design due to spammy nature of the event."
    );
}

/// Payload carrying `action` where the policy row looks for it.
fn with_action(source: ActionSource, action: &str) -> Option<Value> {
    match source {
        ActionSource::Action => Some(json!({ "action": action })),
        ActionSource::RefType => Some(json!({ "ref": "x", "ref_type": action })),
        ActionSource::ReviewState => Some(json!({
            "action": "submitted",
            "review": { "state": action }
        })),
        ActionSource::NoAction => None,
    }
}

#[test]
fn every_ignored_action_in_the_table_is_ignored() {
    let mut checked = 0;
    for policy in policies() {
        for action in policy.ignored {
            let payload = with_action(policy.source, action)
                .unwrap_or_else(|| panic!("{} ignores {action} but has no action", policy.event));
            assert_ignored(policy.event, payload, &format!("{} - {action}", policy.event));
            checked += 1;
        }
    }
    assert!(checked > 0);
}

#[test]
fn ignored_issue_actions() {
    for action in ["labeled", "unlabeled", "assigned", "unassigned"] {
        assert_ignored(
            "issues",
            json!({ "action": action }),
            &format!("issues - {action}"),
        );
    }
}

#[test]
fn ignored_pull_request_actions() {
    for action in [
        "synchronize",
        "labeled",
        "unlabeled",
        "assigned",
        "unassigned",
        "review_requested",
        "review_request_removed",
    ] {
        assert_ignored(
            "pull_request",
            json!({ "action": action }),
            &format!("pull_request - {action}"),
        );
    }
}

#[test]
fn commented_reviews_are_ignored() {
    assert_ignored(
        "pull_request_review",
        json!({ "action": "submitted", "review": { "state": "commented" } }),
        "pull_request_review - commented",
    );
}

#[test]
fn edited_milestones_are_ignored() {
    assert_ignored(
        "milestone",
        json!({ "action": "edited" }),
        "milestone - edited",
    );
}

// ── Not implemented ───────────────────────────────────────────────────────────

#[test]
fn unknown_actions_are_not_implemented() {
    for event in [
        "issues",
        "member",
        "release",
        "repository",
        "pull_request",
        "issue_comment",
        "commit_comment",
        "pull_request_review_comment",
    ] {
        assert_not_implemented(event, json!({ "action": UNKNOWN_ACTION }), Some(UNKNOWN_ACTION));
    }
}

#[test]
fn unknown_action_message_names_the_action() {
    let err = failure(&DiscordRenderer, "issues", json!({ "action": UNKNOWN_ACTION }));
    assert_eq!(
        err.to_string(),
        format!("Unsupported action type \"{UNKNOWN_ACTION}\" in event type \"issues\".")
    );
}

#[test]
fn unknown_event_type_is_not_implemented() {
    assert_not_implemented("surely_this_event_does_not_exist", Value::Null, None);

    let err = failure(&IrcRenderer, "surely_this_event_does_not_exist", Value::Null);
    assert!(err.to_string().starts_with("Unsupported event type"));
}

#[test]
fn review_actions_other_than_submitted() {
    assert_not_implemented(
        "pull_request_review",
        json!({ "action": "dismissed", "review": { "state": "approved" } }),
        Some("dismissed"),
    );
}

#[test]
fn deleting_unknown_ref_types() {
    assert_not_implemented(
        "delete",
        json!({ "ref": "x", "ref_type": "repository" }),
        Some("repository"),
    );
}

#[test]
fn deleted_push_points_at_delete_event() {
    let payload = common::with(common::push(vec![]), json!({ "deleted": true }));
    assert_not_implemented("push", payload, Some("deleted (use DeleteEvent if needed)"));
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn invalid_event_type_header() {
    for_both("Issues", json!({}), |err| {
        assert!(matches!(
            err,
            ConvertError::Validation(PayloadError::InvalidEventType(_))
        ));
    });
}

#[test]
fn missing_action_field() {
    for_both("issues", json!({ "issue": {} }), |err| {
        assert!(matches!(
            err,
            ConvertError::Validation(PayloadError::MissingField { field: "action", .. })
        ));
    });
}

#[test]
fn supported_action_with_incomplete_payload() {
    for_both("issues", json!({ "action": "opened" }), |err| match err {
        ConvertError::Validation(PayloadError::Invalid { event, .. }) => assert_eq!(event, "issues"),
        other => panic!("expected invalid payload, got {other}"),
    });
}

#[test]
fn empty_wiki_batch() {
    let payload = json!({
        "pages": [],
        "repository": common::repository(),
        "sender": common::sender()
    });
    for_both("gollum", payload, |err| {
        assert!(matches!(
            err,
            ConvertError::Validation(PayloadError::MissingField { field: "pages", .. })
        ));
    });
}
