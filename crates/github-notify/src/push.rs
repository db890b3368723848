//! Push classification shared by both renderers.

use github_types::{Commit, PushEvent};

use crate::error::ConvertError;

/// Most recent distinct commits listed under a push.
pub const COMMIT_WINDOW: usize = 5;

/// Reported for `deleted` pushes; the `delete` event covers those.
pub const DELETED_PUSH: &str = "deleted (use DeleteEvent if needed)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind<'a> {
    /// New branch or tag, optionally based on another ref.
    Created { tag: bool, base: Option<&'a str> },
    Forced,
    /// Only already-known commits arrived on top of `base`.
    Merge { base: &'a str },
    FastForward,
    Commits,
}

#[derive(Debug)]
pub struct PushSummary<'a> {
    pub kind: PushKind<'a>,
    /// Distinct commits, oldest first.
    pub commits: Vec<&'a Commit>,
    pub url: String,
}

impl<'a> PushSummary<'a> {
    /// Classifies a push. Flags are checked in priority order:
    /// created, deleted, forced, then merge / fast-forward / plain push.
    pub fn new(push: &'a PushEvent) -> Result<Self, ConvertError> {
        let commits = push.distinct_commits();

        let kind = if push.created {
            PushKind::Created {
                tag: push.is_tag(),
                base: push.base(),
            }
        } else if push.deleted {
            return Err(ConvertError::not_implemented("push", Some(DELETED_PUSH)));
        } else if push.forced {
            PushKind::Forced
        } else if commits.is_empty() && !push.commits.is_empty() {
            match push.base() {
                Some(base) => PushKind::Merge { base },
                None => PushKind::FastForward,
            }
        } else {
            PushKind::Commits
        };

        let url = compare_url(push, commits.len());

        Ok(Self { kind, commits, url })
    }

    pub fn count(&self) -> usize {
        self.commits.len()
    }

    /// Up to [`COMMIT_WINDOW`] commits, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &'a Commit> + '_ {
        self.commits.iter().rev().take(COMMIT_WINDOW).copied()
    }

    /// Distinct commits left out of [`PushSummary::recent`].
    pub fn hidden(&self) -> usize {
        self.count().saturating_sub(COMMIT_WINDOW)
    }

    /// Verb used to pick a severity colour.
    pub fn action(&self) -> &'static str {
        match self.kind {
            PushKind::Created { .. } => "created",
            PushKind::Forced => "force-pushed",
            PushKind::Merge { .. } => "merged",
            PushKind::FastForward | PushKind::Commits => "pushed",
        }
    }
}

/// Link for a push.
///
/// Force pushes link a two-dot comparison of the full hashes so GitHub shows
/// only what changed between the old and new tip. A single distinct commit
/// links to the commit itself.
pub fn compare_url(push: &PushEvent, distinct: usize) -> String {
    if push.forced {
        let repository = push.repository.web_url().unwrap_or_default();
        return format!("{repository}/compare/{}..{}", push.before, push.after);
    }
    if distinct == 1
        && let Some(head) = &push.head_commit
    {
        return head.url.clone();
    }
    push.compare.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const BEFORE: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const AFTER: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn commit(id: &str, distinct: bool) -> Value {
        json!({
            "id": id,
            "message": format!("commit {id}"),
            "url": format!("https://github.com/o/r/commit/{id}"),
            "author": { "name": "Alice", "username": "alice" },
            "distinct": distinct
        })
    }

    fn push(overrides: Value, commits: Vec<Value>) -> PushEvent {
        let head = commits.last().cloned();
        let mut payload = json!({
            "ref": "refs/heads/main",
            "ref_name": "main",
            "before": BEFORE,
            "after": AFTER,
            "compare": "https://github.com/o/r/compare/aaaaaa...bbbbbb",
            "commits": commits,
            "head_commit": head,
            "pusher": { "name": "alice" },
            "repository": { "name": "r", "full_name": "o/r", "url": "https://github.com/o/r" },
            "sender": { "login": "alice" }
        });
        if let (Some(target), Some(extra)) = (payload.as_object_mut(), overrides.as_object()) {
            target.extend(extra.clone());
        }
        serde_json::from_value(payload).unwrap()
    }

    #[test]
    fn plain_push() {
        let event = push(json!({}), vec![commit("c1", true), commit("c2", true)]);
        let summary = PushSummary::new(&event).unwrap();
        assert_eq!(summary.kind, PushKind::Commits);
        assert_eq!(summary.count(), 2);
        assert_eq!(summary.url, "https://github.com/o/r/compare/aaaaaa...bbbbbb");
        assert_eq!(summary.action(), "pushed");
    }

    #[test]
    fn single_commit_links_head_commit() {
        let event = push(json!({}), vec![commit("c1", true)]);
        let summary = PushSummary::new(&event).unwrap();
        assert_eq!(summary.url, "https://github.com/o/r/commit/c1");
    }

    #[test]
    fn forced_push_uses_two_dot_compare() {
        let event = push(json!({ "forced": true }), vec![commit("c1", true)]);
        let summary = PushSummary::new(&event).unwrap();
        assert_eq!(summary.kind, PushKind::Forced);
        assert_eq!(
            summary.url,
            format!("https://github.com/o/r/compare/{BEFORE}..{AFTER}")
        );
        assert!(!summary.url.contains("..."));
        assert_eq!(summary.action(), "force-pushed");
    }

    #[test]
    fn deleted_push_is_not_implemented() {
        let event = push(json!({ "deleted": true }), vec![]);
        let err = PushSummary::new(&event).unwrap_err();
        match err {
            ConvertError::NotImplemented { event, action } => {
                assert_eq!(event, "push");
                assert_eq!(action.as_deref(), Some(DELETED_PUSH));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn created_wins_over_other_flags() {
        let event = push(
            json!({ "created": true, "deleted": true, "forced": true }),
            vec![commit("c1", true)],
        );
        let summary = PushSummary::new(&event).unwrap();
        assert_eq!(
            summary.kind,
            PushKind::Created {
                tag: false,
                base: None
            }
        );
    }

    #[test]
    fn created_tag_from_base() {
        let event = push(
            json!({
                "created": true,
                "ref": "refs/tags/v1.0",
                "ref_name": "v1.0",
                "base_ref": "refs/heads/main",
                "base_ref_name": "main"
            }),
            vec![],
        );
        let summary = PushSummary::new(&event).unwrap();
        assert_eq!(
            summary.kind,
            PushKind::Created {
                tag: true,
                base: Some("main")
            }
        );
    }

    #[test]
    fn only_duplicate_commits_is_merge_or_fast_forward() {
        let merge = push(
            json!({ "base_ref": "refs/heads/dev", "base_ref_name": "dev" }),
            vec![commit("c1", false)],
        );
        assert_eq!(
            PushSummary::new(&merge).unwrap().kind,
            PushKind::Merge { base: "dev" }
        );

        let fast_forward = push(json!({}), vec![commit("c1", false)]);
        assert_eq!(
            PushSummary::new(&fast_forward).unwrap().kind,
            PushKind::FastForward
        );
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let commits = (1..=7).map(|i| commit(&format!("c{i}"), true)).collect();
        let event = push(json!({}), commits);
        let summary = PushSummary::new(&event).unwrap();

        let ids: Vec<&str> = summary.recent().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c7", "c6", "c5", "c4", "c3"]);
        assert_eq!(summary.hidden(), 2);
    }
}
