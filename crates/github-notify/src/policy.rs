//! Which event / action pairs become notifications.
//!
//! Every rendered event type has one [`EventPolicy`] row. A decision is made
//! on the normalized payload before the typed event is decoded, so ignored
//! and unknown actions are reported even when the rest of the payload is
//! missing.

use github_types::NormalizedEvent;
use tracing::debug;

use crate::error::ConvertError;

/// Event types dropped whatever their action.
pub const GLOBALLY_IGNORED: &[&str] = &["fork", "watch", "star", "status"];

/// Outcome of looking an event up in the policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDecision {
    /// Render with this effective action (`None` for action-less events).
    Render(Option<String>),
    /// Valid but noisy; the reason reads `"<event> - <action>"`.
    Ignore(String),
    Unimplemented {
        event: String,
        action: Option<String>,
    },
}

impl ActionDecision {
    /// The effective action to render with, or the matching error.
    pub fn into_result(self) -> Result<Option<String>, ConvertError> {
        match self {
            Self::Render(action) => Ok(action),
            Self::Ignore(reason) => Err(ConvertError::Ignored(reason)),
            Self::Unimplemented { event, action } => {
                Err(ConvertError::NotImplemented { event, action })
            }
        }
    }
}

/// Where the action of an event lives in its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    /// Top-level `action`.
    Action,
    /// `ref_type` (delete events).
    RefType,
    /// `review.state`, only for `action == "submitted"`.
    ReviewState,
    /// The event has no action.
    NoAction,
}

#[derive(Debug)]
pub struct EventPolicy {
    pub event: &'static str,
    pub source: ActionSource,
    pub ignored: &'static [&'static str],
    pub supported: &'static [&'static str],
    /// Raw action to display action, applied before any set lookup.
    pub remap: &'static [(&'static str, &'static str)],
    /// Action reported to the renderer instead of the looked-up one.
    pub render_as: Option<&'static str>,
}

impl EventPolicy {
    const fn new(event: &'static str, source: ActionSource) -> Self {
        Self {
            event,
            source,
            ignored: &[],
            supported: &[],
            remap: &[],
            render_as: None,
        }
    }

    const fn ignored(mut self, ignored: &'static [&'static str]) -> Self {
        self.ignored = ignored;
        self
    }

    const fn supported(mut self, supported: &'static [&'static str]) -> Self {
        self.supported = supported;
        self
    }

    const fn remap(mut self, remap: &'static [(&'static str, &'static str)]) -> Self {
        self.remap = remap;
        self
    }

    const fn render_as(mut self, action: &'static str) -> Self {
        self.render_as = Some(action);
        self
    }

    fn effective_action<'a>(&self, event: &NormalizedEvent, action: &'a str) -> &'a str {
        if self.event == "pull_request" && action == "closed" {
            return if event.bool_at("/pull_request/merged") == Some(true) {
                "merged"
            } else {
                "closed without merging"
            };
        }
        self.remap
            .iter()
            .find(|(from, _)| *from == action)
            .map_or(action, |(_, to)| *to)
    }

    fn classify(&self, event: &NormalizedEvent, action: &str) -> ActionDecision {
        let action = self.effective_action(event, action);

        if self.ignored.contains(&action) {
            return ActionDecision::Ignore(format!("{} - {}", self.event, action));
        }
        if self.supported.contains(&action) {
            let rendered = self.render_as.unwrap_or(action);
            return ActionDecision::Render(Some(rendered.to_string()));
        }
        ActionDecision::Unimplemented {
            event: self.event.to_string(),
            action: Some(action.to_string()),
        }
    }
}

static POLICIES: &[EventPolicy] = &[
    EventPolicy::new("ping", ActionSource::NoAction),
    EventPolicy::new("push", ActionSource::NoAction),
    EventPolicy::new("public", ActionSource::NoAction),
    EventPolicy::new("gollum", ActionSource::NoAction),
    EventPolicy::new("delete", ActionSource::RefType)
        .supported(&["branch", "tag"])
        .render_as("deleted"),
    EventPolicy::new("issues", ActionSource::Action)
        .ignored(&[
            "edited",
            "unpinned",
            "milestoned",
            "demilestoned",
            "labeled",
            "unlabeled",
            "assigned",
            "unassigned",
        ])
        .supported(&[
            "opened",
            "closed",
            "reopened",
            "deleted",
            "pinned",
            "locked",
            "unlocked",
            "transferred",
        ]),
    EventPolicy::new("pull_request", ActionSource::Action)
        .remap(&[
            ("ready_for_review", "readied"),
            ("auto_merge_enabled", "enabled auto-merge"),
            ("converted_to_draft", "converted to draft"),
        ])
        .ignored(&[
            "edited",
            "synchronize",
            "labeled",
            "unlabeled",
            "assigned",
            "unassigned",
            "review_requested",
            "review_request_removed",
        ])
        .supported(&[
            "opened",
            "reopened",
            "deleted",
            "merged",
            "locked",
            "unlocked",
            "readied",
            "enabled auto-merge",
            "converted to draft",
            "closed without merging",
        ]),
    EventPolicy::new("milestone", ActionSource::Action)
        .ignored(&["edited"])
        .supported(&["opened", "closed", "created", "deleted"]),
    EventPolicy::new("package", ActionSource::Action).supported(&["published", "updated"]),
    EventPolicy::new("project", ActionSource::Action)
        .ignored(&["edited"])
        .supported(&["created", "closed", "reopened", "deleted"]),
    EventPolicy::new("release", ActionSource::Action).supported(&["published", "unpublished"]),
    EventPolicy::new("commit_comment", ActionSource::Action).supported(&["created"]),
    EventPolicy::new("issue_comment", ActionSource::Action)
        .ignored(&["edited"])
        .supported(&["created", "deleted"]),
    EventPolicy::new("pull_request_review", ActionSource::ReviewState)
        .remap(&[("changes_requested", "requested changes in")])
        .ignored(&["commented"])
        .supported(&["approved", "requested changes in"]),
    EventPolicy::new("pull_request_review_comment", ActionSource::Action).supported(&["created"]),
    EventPolicy::new("discussion", ActionSource::Action)
        .remap(&[("category_changed", "changed category")])
        .ignored(&["edited", "labeled", "unlabeled", "answered", "unanswered"])
        .supported(&[
            "created",
            "deleted",
            "pinned",
            "unpinned",
            "locked",
            "unlocked",
            "transferred",
            "changed category",
        ]),
    EventPolicy::new("discussion_comment", ActionSource::Action)
        .ignored(&["edited"])
        .supported(&["created", "deleted"]),
    EventPolicy::new("repository_vulnerability_alert", ActionSource::Action)
        .remap(&[("resolve", "resolved"), ("dismiss", "dismissed")])
        .supported(&["create", "resolved", "dismissed"]),
    EventPolicy::new("member", ActionSource::Action).supported(&["added", "removed"]),
    EventPolicy::new("repository", ActionSource::Action)
        .ignored(&["edited"])
        .supported(&[
            "created",
            "deleted",
            "archived",
            "unarchived",
            "transferred",
            "renamed",
            "publicized",
            "privatized",
        ]),
];

/// Every row of the policy table.
pub fn policies() -> impl Iterator<Item = &'static EventPolicy> {
    POLICIES.iter()
}

pub fn policy_for(event_type: &str) -> Option<&'static EventPolicy> {
    policies().find(|policy| policy.event == event_type)
}

/// Decides what to do with an event.
///
/// Fails only when the field holding the action is absent.
pub fn decide(event: &NormalizedEvent) -> Result<ActionDecision, ConvertError> {
    let event_type = event.event_type();

    if GLOBALLY_IGNORED.contains(&event_type) {
        return Ok(ActionDecision::Ignore(event_type.to_string()));
    }

    let Some(policy) = policy_for(event_type) else {
        debug!(event = event_type, "No policy for event type");
        return Ok(ActionDecision::Unimplemented {
            event: event_type.to_string(),
            action: None,
        });
    };

    let decision = match policy.source {
        ActionSource::NoAction => ActionDecision::Render(None),
        ActionSource::Action => {
            let action = event
                .action()
                .ok_or_else(|| ConvertError::missing_field(event_type, "action"))?;
            policy.classify(event, action)
        }
        ActionSource::RefType => {
            let ref_type = event
                .str_at("/ref_type")
                .ok_or_else(|| ConvertError::missing_field(event_type, "ref_type"))?;
            policy.classify(event, ref_type)
        }
        ActionSource::ReviewState => {
            let action = event
                .action()
                .ok_or_else(|| ConvertError::missing_field(event_type, "action"))?;
            if action != "submitted" {
                return Ok(ActionDecision::Unimplemented {
                    event: event_type.to_string(),
                    action: Some(action.to_string()),
                });
            }
            let state = event
                .str_at("/review/state")
                .ok_or_else(|| ConvertError::missing_field(event_type, "review.state"))?;
            policy.classify(event, state)
        }
    };

    debug!(event = event_type, ?decision, "Action decision");
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decide_on(event_type: &str, payload: Value) -> ActionDecision {
        let event = NormalizedEvent::new(event_type, payload).unwrap();
        decide(&event).unwrap()
    }

    fn render(action: &str) -> ActionDecision {
        ActionDecision::Render(Some(action.to_string()))
    }

    fn unimplemented(event: &str, action: &str) -> ActionDecision {
        ActionDecision::Unimplemented {
            event: event.to_string(),
            action: Some(action.to_string()),
        }
    }

    #[test]
    fn globally_ignored_regardless_of_payload() {
        for event in GLOBALLY_IGNORED {
            assert_eq!(
                decide_on(event, Value::Null),
                ActionDecision::Ignore(event.to_string())
            );
        }
    }

    #[test]
    fn unknown_event_type() {
        assert_eq!(
            decide_on("sponsorship", json!({ "action": "created" })),
            ActionDecision::Unimplemented {
                event: "sponsorship".to_string(),
                action: None
            }
        );
    }

    #[test]
    fn action_less_events_render() {
        for event in ["ping", "push", "public", "gollum"] {
            assert_eq!(decide_on(event, json!({})), ActionDecision::Render(None));
        }
    }

    #[test]
    fn ignored_issue_actions() {
        for action in ["labeled", "unlabeled", "assigned", "unassigned", "edited"] {
            assert_eq!(
                decide_on("issues", json!({ "action": action })),
                ActionDecision::Ignore(format!("issues - {action}"))
            );
        }
    }

    #[test]
    fn supported_issue_actions() {
        assert_eq!(decide_on("issues", json!({ "action": "opened" })), render("opened"));
        assert_eq!(decide_on("issues", json!({ "action": "transferred" })), render("transferred"));
    }

    #[test]
    fn unknown_issue_action() {
        assert_eq!(
            decide_on("issues", json!({ "action": "surely_this_action_does_not_exist" })),
            unimplemented("issues", "surely_this_action_does_not_exist")
        );
    }

    #[test]
    fn missing_action_is_validation_error() {
        let event = NormalizedEvent::new("issues", json!({})).unwrap();
        let err = decide(&event).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
    }

    #[test]
    fn pull_request_closed_depends_on_merged() {
        let merged = json!({ "action": "closed", "pull_request": { "merged": true } });
        assert_eq!(decide_on("pull_request", merged), render("merged"));

        let unmerged = json!({ "action": "closed", "pull_request": { "merged": false } });
        assert_eq!(decide_on("pull_request", unmerged), render("closed without merging"));

        let missing = json!({ "action": "closed" });
        assert_eq!(decide_on("pull_request", missing), render("closed without merging"));
    }

    #[test]
    fn pull_request_remaps() {
        assert_eq!(
            decide_on("pull_request", json!({ "action": "ready_for_review" })),
            render("readied")
        );
        assert_eq!(
            decide_on("pull_request", json!({ "action": "converted_to_draft" })),
            render("converted to draft")
        );
        assert_eq!(
            decide_on("pull_request", json!({ "action": "auto_merge_enabled" })),
            render("enabled auto-merge")
        );
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
            assert_eq!(
                decide_on("pull_request", json!({ "action": action })),
                ActionDecision::Ignore(format!("pull_request - {action}"))
            );
        }
    }

    #[test]
    fn review_requires_submitted() {
        assert_eq!(
            decide_on(
                "pull_request_review",
                json!({ "action": "edited", "review": { "state": "approved" } })
            ),
            unimplemented("pull_request_review", "edited")
        );
    }

    #[test]
    fn review_state_decides() {
        let review = |state: &str| json!({ "action": "submitted", "review": { "state": state } });

        assert_eq!(
            decide_on("pull_request_review", review("commented")),
            ActionDecision::Ignore("pull_request_review - commented".to_string())
        );
        assert_eq!(decide_on("pull_request_review", review("approved")), render("approved"));
        assert_eq!(
            decide_on("pull_request_review", review("changes_requested")),
            render("requested changes in")
        );
        assert_eq!(
            decide_on("pull_request_review", review("pending")),
            unimplemented("pull_request_review", "pending")
        );
    }

    #[test]
    fn delete_uses_ref_type() {
        assert_eq!(decide_on("delete", json!({ "ref_type": "branch" })), render("deleted"));
        assert_eq!(decide_on("delete", json!({ "ref_type": "tag" })), render("deleted"));
        assert_eq!(
            decide_on("delete", json!({ "ref_type": "repository" })),
            unimplemented("delete", "repository")
        );
    }

    #[test]
    fn vulnerability_remaps() {
        let event = "repository_vulnerability_alert";
        assert_eq!(decide_on(event, json!({ "action": "create" })), render("create"));
        assert_eq!(decide_on(event, json!({ "action": "resolve" })), render("resolved"));
        assert_eq!(decide_on(event, json!({ "action": "dismiss" })), render("dismissed"));
        assert_eq!(decide_on(event, json!({ "action": "reopen" })), unimplemented(event, "reopen"));
    }

    #[test]
    fn discussion_category_change() {
        assert_eq!(
            decide_on("discussion", json!({ "action": "category_changed" })),
            render("changed category")
        );
        assert_eq!(
            decide_on("discussion", json!({ "action": "answered" })),
            ActionDecision::Ignore("discussion - answered".to_string())
        );
    }

    #[test]
    fn sets_are_disjoint() {
        for policy in POLICIES {
            for action in policy.ignored {
                assert!(
                    !policy.supported.contains(action),
                    "{} lists {action} as both ignored and supported",
                    policy.event
                );
            }
        }
    }

    #[test]
    fn decision_into_result() {
        let action = render("opened").into_result().unwrap();
        assert_eq!(action.as_deref(), Some("opened"));

        let ignored = ActionDecision::Ignore("fork".to_string()).into_result();
        assert!(ignored.unwrap_err().is_ignored());

        let unimplemented = unimplemented("issues", "frobbed").into_result().unwrap_err();
        assert!(matches!(unimplemented, ConvertError::NotImplemented { .. }));
    }
}
