//! Typed webhook events, discriminated by the `X-GitHub-Event` header.
//!
//! Only the fields the notification renderers read are modelled; unknown
//! fields are ignored. Fields GitHub documents as always present are plain
//! values, so decoding fails when they are missing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Branch, Comment, Commit, Repository, User, short_sha};
use crate::error::{PayloadError, Result};
use crate::normalize::NormalizedEvent;

// ── Event records ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hook {
    pub id: u64,
}

/// `ping`: sent once when a hook is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingEvent {
    pub zen: String,
    pub hook: Hook,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pusher {
    pub name: String,
}

/// `push`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    /// Filled in by normalization.
    pub ref_name: String,
    #[serde(default)]
    pub base_ref: Option<String>,
    #[serde(default)]
    pub base_ref_name: Option<String>,
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub forced: bool,
    #[serde(default)]
    pub compare: String,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub head_commit: Option<Commit>,
    pub pusher: Pusher,
    pub repository: Repository,
    pub sender: User,
}

impl PushEvent {
    /// Distinct commits with a message, in payload order (oldest first).
    pub fn distinct_commits(&self) -> Vec<&Commit> {
        self.commits.iter().filter(|c| c.is_distinct()).collect()
    }

    pub fn before_sha(&self) -> &str {
        short_sha(&self.before)
    }

    pub fn after_sha(&self) -> &str {
        short_sha(&self.after)
    }

    pub fn is_tag(&self) -> bool {
        self.reference.starts_with("refs/tags/")
    }

    /// Base ref name when the push was based on another ref.
    pub fn base(&self) -> Option<&str> {
        self.base_ref.as_ref()?;
        self.base_ref_name.as_deref()
    }
}

/// `delete`: a branch or tag was removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    pub ref_type: String,
    pub repository: Repository,
    pub sender: User,
}

/// `public`: a private repository was made public.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicEvent {
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// `issues`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: Issue,
    pub repository: Repository,
    pub sender: User,
}

/// `member`: collaborator added or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberEvent {
    pub action: String,
    pub member: User,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikiPage {
    #[serde(default)]
    pub page_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub action: String,
    #[serde(default)]
    pub sha: String,
    pub html_url: String,
}

impl WikiPage {
    /// Page URL; edits link to the revision diff since GitHub sends none.
    pub fn link(&self) -> String {
        if self.action == "edited" && !self.sha.is_empty() {
            format!("{}/_compare/{}", self.html_url, self.sha)
        } else {
            self.html_url.clone()
        }
    }
}

/// `gollum`: one or more wiki pages changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GollumEvent {
    #[serde(default)]
    pub pages: Vec<WikiPage>,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageVersion {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub name: String,
    pub package_type: String,
    pub html_url: String,
    pub package_version: PackageVersion,
}

/// `package`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageEvent {
    pub action: String,
    pub package: Package,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// `project` (classic projects)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectEvent {
    pub action: String,
    pub project: Project,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    #[serde(default)]
    pub name: Option<String>,
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub body: Option<String>,
}

impl Release {
    /// Release name, or the tag when the release is unnamed.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// `release`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseEvent {
    pub action: String,
    pub release: Release,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `milestone`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilestoneEvent {
    pub action: String,
    pub milestone: Milestone,
    pub repository: Repository,
    pub sender: User,
}

/// `repository`: created, archived, renamed, ...
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryEvent {
    pub action: String,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: Option<bool>,
    pub user: User,
    pub base: Branch,
}

/// `pull_request`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub sender: User,
}

/// `issue_comment`: comments on issues and on pull request conversations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueCommentEvent {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
    pub repository: Repository,
    pub sender: User,
}

/// `commit_comment`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitCommentEvent {
    pub action: String,
    pub comment: Comment,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// `pull_request_review`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequestReviewEvent {
    pub action: String,
    pub review: Review,
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub sender: User,
}

/// `pull_request_review_comment`: a comment on a pull request diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequestReviewCommentEvent {
    pub action: String,
    pub comment: Comment,
    pub pull_request: PullRequest,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discussion {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// `discussion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscussionEvent {
    pub action: String,
    pub discussion: Discussion,
    pub repository: Repository,
    pub sender: User,
}

/// `discussion_comment`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscussionCommentEvent {
    pub action: String,
    pub discussion: Discussion,
    pub comment: Comment,
    pub repository: Repository,
    pub sender: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VulnerabilityAlert {
    pub affected_package_name: String,
    #[serde(default)]
    pub affected_range: Option<String>,
    #[serde(default)]
    pub fixed_in: Option<String>,
    pub external_identifier: String,
    pub external_reference: String,
}

/// `repository_vulnerability_alert`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryVulnerabilityAlertEvent {
    pub action: String,
    pub alert: VulnerabilityAlert,
    pub repository: Repository,
    pub sender: User,
}

// ── Union ─────────────────────────────────────────────────────────────────────

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum GithubEvent {
    Ping(PingEvent),
    Push(PushEvent),
    Delete(DeleteEvent),
    Public(PublicEvent),
    Issues(IssuesEvent),
    Member(MemberEvent),
    Gollum(GollumEvent),
    Package(PackageEvent),
    Project(ProjectEvent),
    Release(ReleaseEvent),
    Milestone(MilestoneEvent),
    Repository(RepositoryEvent),
    PullRequest(PullRequestEvent),
    IssueComment(IssueCommentEvent),
    CommitComment(CommitCommentEvent),
    PullRequestReview(PullRequestReviewEvent),
    PullRequestReviewComment(PullRequestReviewCommentEvent),
    Discussion(DiscussionEvent),
    DiscussionComment(DiscussionCommentEvent),
    RepositoryVulnerabilityAlert(RepositoryVulnerabilityAlertEvent),
}

impl GithubEvent {
    /// Decodes the typed record matching the event type.
    pub fn from_normalized(event: NormalizedEvent) -> Result<Self> {
        let event_type = event.event_type().to_string();
        let payload = event.into_payload();

        let typed = match event_type.as_str() {
            "ping" => Self::Ping(decode(&event_type, payload)?),
            "push" => Self::Push(decode(&event_type, payload)?),
            "delete" => Self::Delete(decode(&event_type, payload)?),
            "public" => Self::Public(decode(&event_type, payload)?),
            "issues" => Self::Issues(decode(&event_type, payload)?),
            "member" => Self::Member(decode(&event_type, payload)?),
            "gollum" => Self::Gollum(decode(&event_type, payload)?),
            "package" => Self::Package(decode(&event_type, payload)?),
            "project" => Self::Project(decode(&event_type, payload)?),
            "release" => Self::Release(decode(&event_type, payload)?),
            "milestone" => Self::Milestone(decode(&event_type, payload)?),
            "repository" => Self::Repository(decode(&event_type, payload)?),
            "pull_request" => Self::PullRequest(decode(&event_type, payload)?),
            "issue_comment" => Self::IssueComment(decode(&event_type, payload)?),
            "commit_comment" => Self::CommitComment(decode(&event_type, payload)?),
            "pull_request_review" => Self::PullRequestReview(decode(&event_type, payload)?),
            "pull_request_review_comment" => {
                Self::PullRequestReviewComment(decode(&event_type, payload)?)
            }
            "discussion" => Self::Discussion(decode(&event_type, payload)?),
            "discussion_comment" => Self::DiscussionComment(decode(&event_type, payload)?),
            "repository_vulnerability_alert" => {
                Self::RepositoryVulnerabilityAlert(decode(&event_type, payload)?)
            }
            _ => return Err(PayloadError::UnknownEvent(event_type)),
        };

        Ok(typed)
    }

    /// Event type header value.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Ping(_) => "ping",
            Self::Push(_) => "push",
            Self::Delete(_) => "delete",
            Self::Public(_) => "public",
            Self::Issues(_) => "issues",
            Self::Member(_) => "member",
            Self::Gollum(_) => "gollum",
            Self::Package(_) => "package",
            Self::Project(_) => "project",
            Self::Release(_) => "release",
            Self::Milestone(_) => "milestone",
            Self::Repository(_) => "repository",
            Self::PullRequest(_) => "pull_request",
            Self::IssueComment(_) => "issue_comment",
            Self::CommitComment(_) => "commit_comment",
            Self::PullRequestReview(_) => "pull_request_review",
            Self::PullRequestReviewComment(_) => "pull_request_review_comment",
            Self::Discussion(_) => "discussion",
            Self::DiscussionComment(_) => "discussion_comment",
            Self::RepositoryVulnerabilityAlert(_) => "repository_vulnerability_alert",
        }
    }

    pub fn repository(&self) -> &Repository {
        match self {
            Self::Ping(e) => &e.repository,
            Self::Push(e) => &e.repository,
            Self::Delete(e) => &e.repository,
            Self::Public(e) => &e.repository,
            Self::Issues(e) => &e.repository,
            Self::Member(e) => &e.repository,
            Self::Gollum(e) => &e.repository,
            Self::Package(e) => &e.repository,
            Self::Project(e) => &e.repository,
            Self::Release(e) => &e.repository,
            Self::Milestone(e) => &e.repository,
            Self::Repository(e) => &e.repository,
            Self::PullRequest(e) => &e.repository,
            Self::IssueComment(e) => &e.repository,
            Self::CommitComment(e) => &e.repository,
            Self::PullRequestReview(e) => &e.repository,
            Self::PullRequestReviewComment(e) => &e.repository,
            Self::Discussion(e) => &e.repository,
            Self::DiscussionComment(e) => &e.repository,
            Self::RepositoryVulnerabilityAlert(e) => &e.repository,
        }
    }

    pub fn sender(&self) -> &User {
        match self {
            Self::Ping(e) => &e.sender,
            Self::Push(e) => &e.sender,
            Self::Delete(e) => &e.sender,
            Self::Public(e) => &e.sender,
            Self::Issues(e) => &e.sender,
            Self::Member(e) => &e.sender,
            Self::Gollum(e) => &e.sender,
            Self::Package(e) => &e.sender,
            Self::Project(e) => &e.sender,
            Self::Release(e) => &e.sender,
            Self::Milestone(e) => &e.sender,
            Self::Repository(e) => &e.sender,
            Self::PullRequest(e) => &e.sender,
            Self::IssueComment(e) => &e.sender,
            Self::CommitComment(e) => &e.sender,
            Self::PullRequestReview(e) => &e.sender,
            Self::PullRequestReviewComment(e) => &e.sender,
            Self::Discussion(e) => &e.sender,
            Self::DiscussionComment(e) => &e.sender,
            Self::RepositoryVulnerabilityAlert(e) => &e.sender,
        }
    }
}

fn decode<T: DeserializeOwned>(event_type: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| PayloadError::Invalid {
        event: event_type.to_string(),
        source,
    })
}
