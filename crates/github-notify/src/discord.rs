//! Discord webhook embeds.
//!
//! The embed author is always the event sender and the footer names the
//! repository. Titles are short sentences; bodies only appear on the action
//! that creates the issue, pull request or discussion.

use github_types::{
    CommitCommentEvent, DeleteEvent, DiscussionCommentEvent, DiscussionEvent, GithubEvent,
    GollumEvent, IssueCommentEvent, IssuesEvent, MemberEvent, MilestoneEvent, PackageEvent,
    PingEvent, ProjectEvent, PublicEvent, PullRequestEvent, PullRequestReviewCommentEvent,
    PullRequestReviewEvent, PushEvent, ReleaseEvent, RepositoryEvent,
    RepositoryVulnerabilityAlertEvent, short_sha,
};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::push::{PushKind, PushSummary};
use crate::render::{Renderer, require_action};
use crate::severity::Severity;
use crate::text::{
    DEFAULT_DESCRIPTION_LIMIT, ELLIPSIS, code_span, escape_markdown, pluralize, short_description,
    short_message,
};

pub const GITHUB_ICON_URL: &str = "https://docs.github.com/assets/images/site/favicon.svg";

/// Discord accepts at most this many embeds per message.
pub const MAX_EMBEDS: usize = 10;

/// Characters of user text kept in a title.
const TITLE_TEXT_LIMIT: usize = 200;
/// Discord rejects embed titles longer than this.
pub const MAX_TITLE_CHARS: usize = 256;
const COMMIT_MESSAGE_LIMIT: usize = 50;

// ── Wire types ────────────────────────────────────────────────────────────────

/// Body of a Discord webhook execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscordMessage {
    pub embeds: Vec<Embed>,
}

/// Embed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Embed author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Embed footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    pub author: EmbedAuthor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

impl Embed {
    /// Embed with author and footer taken from the event.
    fn for_event(event: &GithubEvent, title: String, url: Option<&str>, action: &str) -> Self {
        let sender = event.sender();
        Self {
            title: cap_title(title),
            url: url.map(str::to_owned),
            description: None,
            color: color(Severity::of(action)),
            author: EmbedAuthor {
                name: sender.login.clone(),
                url: sender.html_url.clone(),
                icon_url: sender.avatar_url.clone(),
            },
            fields: Vec::new(),
            footer: EmbedFooter {
                text: event.repository().full_name(),
                icon_url: Some(GITHUB_ICON_URL.to_string()),
            },
        }
    }

    fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    fn with_field(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.fields.push(EmbedField {
                name: name.to_string(),
                value: escape_markdown(value),
                inline: true,
            });
        }
        self
    }
}

/// RGB colour for a severity bucket.
pub fn color(severity: Severity) -> u32 {
    match severity {
        Severity::Created => 16750592,
        Severity::Closed | Severity::Destructive => 16007990,
        Severity::Merged => 7291585,
        Severity::Neutral => 5025616,
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordRenderer;

impl Renderer for DiscordRenderer {
    type Output = DiscordMessage;

    fn render(
        &self,
        event: &GithubEvent,
        action: Option<&str>,
    ) -> Result<DiscordMessage, ConvertError> {
        let embed = match event {
            GithubEvent::Ping(e) => ping(event, e),
            GithubEvent::Push(e) => push(event, e)?,
            GithubEvent::Public(e) => public(event, e),
            GithubEvent::Gollum(e) => return gollum(event, e),
            GithubEvent::Delete(e) => delete(event, e, require_action(event, action)?),
            GithubEvent::Issues(e) => issues(event, e, require_action(event, action)?),
            GithubEvent::Member(e) => member(event, e, require_action(event, action)?),
            GithubEvent::Package(e) => package(event, e, require_action(event, action)?),
            GithubEvent::Project(e) => project(event, e, require_action(event, action)?),
            GithubEvent::Release(e) => release(event, e, require_action(event, action)?),
            GithubEvent::Milestone(e) => milestone(event, e, require_action(event, action)?),
            GithubEvent::Repository(e) => repository(event, e, require_action(event, action)?),
            GithubEvent::PullRequest(e) => pull_request(event, e, require_action(event, action)?),
            GithubEvent::IssueComment(e) => {
                issue_comment(event, e, require_action(event, action)?)?
            }
            GithubEvent::CommitComment(e) => commit_comment(event, e),
            GithubEvent::PullRequestReview(e) => review(event, e, require_action(event, action)?),
            GithubEvent::PullRequestReviewComment(e) => review_comment(event, e),
            GithubEvent::Discussion(e) => discussion(event, e, require_action(event, action)?),
            GithubEvent::DiscussionComment(e) => {
                discussion_comment(event, e, require_action(event, action)?)?
            }
            GithubEvent::RepositoryVulnerabilityAlert(e) => {
                vulnerability(event, e, require_action(event, action)?)
            }
        };

        Ok(DiscordMessage {
            embeds: vec![embed],
        })
    }
}

fn text(value: &str) -> String {
    escape_markdown(&short_message(value, TITLE_TEXT_LIMIT))
}

/// Cuts an escaped title to [`MAX_TITLE_CHARS`] without leaving a dangling
/// backslash in front of the ellipsis.
fn cap_title(title: String) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title;
    }
    let cut = short_message(&title, MAX_TITLE_CHARS - 1);
    let kept = cut.strip_suffix(ELLIPSIS).unwrap_or(&cut);
    let backslashes = kept.chars().rev().take_while(|c| *c == '\\').count();
    let kept = if backslashes % 2 == 1 {
        &kept[..kept.len() - 1]
    } else {
        kept
    };
    format!("{kept}{ELLIPSIS}")
}

fn description(body: Option<&str>) -> Option<String> {
    body.map(|b| escape_markdown(&short_description(b, DEFAULT_DESCRIPTION_LIMIT)))
}

// ── Events ────────────────────────────────────────────────────────────────────

fn ping(event: &GithubEvent, e: &PingEvent) -> Embed {
    Embed::for_event(
        event,
        format!("Hook {} worked!", e.hook.id),
        e.repository.web_url(),
        "",
    )
    .with_description(Some(escape_markdown(&e.zen)))
}

fn push(event: &GithubEvent, e: &PushEvent) -> Result<Embed, ConvertError> {
    let summary = PushSummary::new(e)?;
    let count = summary.count();
    let reference = code_span(&e.ref_name);

    let title = match summary.kind {
        PushKind::Created { tag: true, base } => {
            let at = base.map_or_else(|| code_span(e.after_sha()), code_span);
            format!("tagged {reference} at {at}")
        }
        PushKind::Created { tag: false, base } => {
            let mut title = format!("created {reference}");
            if let Some(base) = base {
                title.push_str(&format!(" from {}", code_span(base)));
            } else if count > 0 {
                title.push_str(&format!(" at {}", code_span(e.after_sha())));
            }
            if count > 0 {
                title.push_str(&format!(" (+{count} new {})", pluralize(count, "commit")));
            }
            title
        }
        PushKind::Forced => format!(
            "force-pushed {reference} from {} to {}",
            code_span(e.before_sha()),
            code_span(e.after_sha())
        ),
        PushKind::Merge { base } => format!("merged {} into {reference}", code_span(base)),
        PushKind::FastForward => format!(
            "fast-forwarded {reference} from {} to {}",
            code_span(e.before_sha()),
            code_span(e.after_sha())
        ),
        PushKind::Commits => format!(
            "pushed {count} new {} to {reference}",
            pluralize(count, "commit")
        ),
    };

    let mut lines: Vec<String> = summary
        .recent()
        .map(|commit| {
            let mut line = format!(
                "[`{}`]({}) {}",
                short_sha(&commit.id),
                commit.url,
                escape_markdown(&short_message(&commit.message, COMMIT_MESSAGE_LIMIT))
            );
            let author = commit
                .author
                .username
                .as_deref()
                .unwrap_or(&commit.author.name);
            if author != e.sender.login {
                line.push_str(&format!(" - {}", escape_markdown(&commit.author.name)));
            }
            line
        })
        .collect();

    let hidden = summary.hidden();
    if hidden > 0 {
        lines.push(format!("and {hidden} more {}", pluralize(hidden, "commit")));
    }

    Ok(
        Embed::for_event(event, title, Some(summary.url.as_str()), summary.action())
            .with_description(Some(lines.join("\n"))),
    )
}

fn delete(event: &GithubEvent, e: &DeleteEvent, action: &str) -> Embed {
    Embed::for_event(
        event,
        format!("{action} {} {}", e.ref_type, code_span(&e.reference)),
        e.repository.web_url(),
        action,
    )
}

fn public(event: &GithubEvent, e: &PublicEvent) -> Embed {
    Embed::for_event(
        event,
        format!(
            "{} is now open source and available to everyone!",
            text(&e.repository.name)
        ),
        e.repository.web_url(),
        "",
    )
}

fn issues(event: &GithubEvent, e: &IssuesEvent, action: &str) -> Embed {
    let embed = Embed::for_event(
        event,
        format!("Issue #{} {action}: {}", e.issue.number, text(&e.issue.title)),
        Some(e.issue.html_url.as_str()),
        action,
    );
    if action == "opened" {
        embed.with_description(description(e.issue.body.as_deref()))
    } else {
        embed
    }
}

fn member(event: &GithubEvent, e: &MemberEvent, action: &str) -> Embed {
    let url = e.member.html_url.as_deref().or(e.repository.web_url());
    Embed::for_event(
        event,
        format!("{action} {} as a collaborator", text(&e.member.login)),
        url,
        action,
    )
}

fn gollum(event: &GithubEvent, e: &GollumEvent) -> Result<DiscordMessage, ConvertError> {
    if e.pages.is_empty() {
        return Err(ConvertError::missing_field("gollum", "pages"));
    }

    let mut embeds: Vec<Embed> = e
        .pages
        .iter()
        .take(MAX_EMBEDS)
        .map(|page| {
            Embed::for_event(
                event,
                format!("{} wiki page {}", page.action, text(&page.title)),
                Some(page.link().as_str()),
                &page.action,
            )
            .with_description(description(page.summary.as_deref()))
        })
        .collect();

    let hidden = e.pages.len().saturating_sub(MAX_EMBEDS);
    if hidden > 0
        && let Some(last) = embeds.last_mut()
    {
        let more = format!("and {hidden} more {}", pluralize(hidden, "page"));
        last.description = Some(match last.description.take() {
            Some(summary) => format!("{summary}\n{more}"),
            None => more,
        });
    }

    Ok(DiscordMessage { embeds })
}

fn package(event: &GithubEvent, e: &PackageEvent, action: &str) -> Embed {
    let package = &e.package;
    Embed::for_event(
        event,
        format!(
            "{action} {} package {} {}",
            package.package_type,
            text(&package.name),
            code_span(&package.package_version.version)
        ),
        Some(package.html_url.as_str()),
        action,
    )
}

fn project(event: &GithubEvent, e: &ProjectEvent, action: &str) -> Embed {
    let embed = Embed::for_event(
        event,
        format!("Project {action}: {}", text(&e.project.name)),
        Some(e.project.html_url.as_str()),
        action,
    );
    if action == "created" {
        embed.with_description(description(e.project.body.as_deref()))
    } else {
        embed
    }
}

fn release(event: &GithubEvent, e: &ReleaseEvent, action: &str) -> Embed {
    let release = &e.release;
    let embed = Embed::for_event(
        event,
        format!(
            "{action} {}release {}",
            if release.prerelease { "pre-" } else { "" },
            text(release.display_name())
        ),
        Some(release.html_url.as_str()),
        action,
    );
    if action == "published" {
        embed.with_description(description(release.body.as_deref()))
    } else {
        embed
    }
}

fn milestone(event: &GithubEvent, e: &MilestoneEvent, action: &str) -> Embed {
    let embed = Embed::for_event(
        event,
        format!(
            "Milestone #{} {action}: {}",
            e.milestone.number,
            text(&e.milestone.title)
        ),
        Some(e.milestone.html_url.as_str()),
        action,
    );
    if action == "created" || action == "opened" {
        embed.with_description(description(e.milestone.description.as_deref()))
    } else {
        embed
    }
}

fn repository(event: &GithubEvent, e: &RepositoryEvent, action: &str) -> Embed {
    Embed::for_event(
        event,
        format!("{action} {}", text(&e.repository.name)),
        e.repository.web_url(),
        action,
    )
}

fn pull_request(event: &GithubEvent, e: &PullRequestEvent, action: &str) -> Embed {
    let pr = &e.pull_request;
    let embed = Embed::for_event(
        event,
        format!(
            "{}PR #{} {action}: {}",
            if pr.draft { "Draft " } else { "" },
            pr.number,
            text(&pr.title)
        ),
        Some(pr.html_url.as_str()),
        action,
    );

    match action {
        "opened" => embed.with_description(description(pr.body.as_deref())),
        "merged" => embed.with_description(Some(format!(
            "Merged from {} to {}",
            escape_markdown(&pr.user.login),
            escape_markdown(&pr.base.reference)
        ))),
        _ => embed,
    }
}

fn issue_comment(
    event: &GithubEvent,
    e: &IssueCommentEvent,
    action: &str,
) -> Result<Embed, ConvertError> {
    match action {
        "created" => Ok(Embed::for_event(
            event,
            format!(
                "commented on issue #{}: {}",
                e.issue.number,
                text(&e.issue.title)
            ),
            Some(e.comment.html_url.as_str()),
            action,
        )
        .with_description(description(e.comment.body.as_deref()))),
        "deleted" => Ok(Embed::for_event(
            event,
            format!(
                "deleted comment in issue #{} from {}",
                e.issue.number,
                text(&e.comment.user.login)
            ),
            Some(e.issue.html_url.as_str()),
            action,
        )),
        other => Err(ConvertError::not_implemented("issue_comment", Some(other))),
    }
}

fn commit_comment(event: &GithubEvent, e: &CommitCommentEvent) -> Embed {
    let commit = short_sha(e.comment.commit_id.as_deref().unwrap_or_default());
    Embed::for_event(
        event,
        format!("commented on commit {}", code_span(commit)),
        Some(e.comment.html_url.as_str()),
        "",
    )
    .with_description(description(e.comment.body.as_deref()))
}

fn review(event: &GithubEvent, e: &PullRequestReviewEvent, action: &str) -> Embed {
    Embed::for_event(
        event,
        format!(
            "{action} PR #{}: {}",
            e.pull_request.number,
            text(&e.pull_request.title)
        ),
        Some(e.review.html_url.as_str()),
        action,
    )
    .with_description(description(e.review.body.as_deref()))
}

fn review_comment(event: &GithubEvent, e: &PullRequestReviewCommentEvent) -> Embed {
    let commit = short_sha(e.comment.commit_id.as_deref().unwrap_or_default());
    Embed::for_event(
        event,
        format!(
            "reviewed PR #{} at {}",
            e.pull_request.number,
            code_span(commit)
        ),
        Some(e.comment.html_url.as_str()),
        "",
    )
    .with_description(description(e.comment.body.as_deref()))
}

fn discussion(event: &GithubEvent, e: &DiscussionEvent, action: &str) -> Embed {
    let embed = Embed::for_event(
        event,
        format!(
            "Discussion #{} {action}: {}",
            e.discussion.number,
            text(&e.discussion.title)
        ),
        Some(e.discussion.html_url.as_str()),
        action,
    );
    if action == "created" {
        embed.with_description(description(e.discussion.body.as_deref()))
    } else {
        embed
    }
}

fn discussion_comment(
    event: &GithubEvent,
    e: &DiscussionCommentEvent,
    action: &str,
) -> Result<Embed, ConvertError> {
    match action {
        "created" => Ok(Embed::for_event(
            event,
            format!(
                "commented on discussion #{}: {}",
                e.discussion.number,
                text(&e.discussion.title)
            ),
            Some(e.comment.html_url.as_str()),
            action,
        )
        .with_description(description(e.comment.body.as_deref()))),
        "deleted" => Ok(Embed::for_event(
            event,
            format!(
                "deleted comment in discussion #{} from {}",
                e.discussion.number,
                text(&e.comment.user.login)
            ),
            Some(e.discussion.html_url.as_str()),
            action,
        )),
        other => Err(ConvertError::not_implemented("discussion_comment", Some(other))),
    }
}

fn vulnerability(
    event: &GithubEvent,
    e: &RepositoryVulnerabilityAlertEvent,
    action: &str,
) -> Embed {
    let alert = &e.alert;
    let title = if action == "create" {
        format!("New vulnerability for {}", text(&alert.affected_package_name))
    } else {
        format!(
            "Vulnerability {action} for {}",
            text(&alert.affected_package_name)
        )
    };

    Embed::for_event(event, title, Some(alert.external_reference.as_str()), action)
        .with_field("Affected range", alert.affected_range.as_deref())
        .with_field("Fixed in", alert.fixed_in.as_deref())
        .with_field("Identifier", Some(alert.external_identifier.as_str()))
}
