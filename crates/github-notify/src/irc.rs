//! mIRC colour-coded one-line notifications.
//!
//! Every piece of user-supplied text goes through [`escape_irc`] so payloads
//! cannot inject their own formatting. Wiki batches are the only multi-line
//! output, one line per page.

use github_types::{
    CommitCommentEvent, DeleteEvent, DiscussionCommentEvent, DiscussionEvent, GithubEvent,
    GollumEvent, IssueCommentEvent, IssuesEvent, MemberEvent, MilestoneEvent, PackageEvent,
    PingEvent, ProjectEvent, PublicEvent, PullRequestEvent, PullRequestReviewCommentEvent,
    PullRequestReviewEvent, PushEvent, ReleaseEvent, Repository, RepositoryEvent,
    RepositoryVulnerabilityAlertEvent, short_sha,
};

use crate::error::ConvertError;
use crate::push::{PushKind, PushSummary};
use crate::render::{Renderer, require_action};
use crate::severity::Severity;
use crate::text::{DEFAULT_MESSAGE_LIMIT, escape_irc, insert_zwj, pluralize, short_message};

const COMMIT_MESSAGE_LIMIT: usize = 50;
const COMMIT_LIST_LIMIT: usize = 200;

const COLOR: char = '\x03';
const BOLD: char = '\x02';
const RESET: char = '\x0f';

#[derive(Debug, Clone, Copy, Default)]
pub struct IrcRenderer;

impl Renderer for IrcRenderer {
    type Output = String;

    fn render(&self, event: &GithubEvent, action: Option<&str>) -> Result<String, ConvertError> {
        let line = match event {
            GithubEvent::Ping(e) => ping(e),
            GithubEvent::Push(e) => push(e)?,
            GithubEvent::Public(e) => public(e),
            GithubEvent::Gollum(e) => gollum(e)?,
            GithubEvent::Delete(e) => delete(e, require_action(event, action)?),
            GithubEvent::Issues(e) => issues(e, require_action(event, action)?),
            GithubEvent::Member(e) => member(e, require_action(event, action)?),
            GithubEvent::Package(e) => package(e, require_action(event, action)?),
            GithubEvent::Project(e) => project(e, require_action(event, action)?),
            GithubEvent::Release(e) => release(e, require_action(event, action)?),
            GithubEvent::Milestone(e) => milestone(e, require_action(event, action)?),
            GithubEvent::Repository(e) => repository(e, require_action(event, action)?),
            GithubEvent::PullRequest(e) => pull_request(e, require_action(event, action)?),
            GithubEvent::IssueComment(e) => issue_comment(e, require_action(event, action)?)?,
            GithubEvent::CommitComment(e) => commit_comment(e),
            GithubEvent::PullRequestReview(e) => review(e, require_action(event, action)?),
            GithubEvent::PullRequestReviewComment(e) => review_comment(e),
            GithubEvent::Discussion(e) => discussion(e, require_action(event, action)?),
            GithubEvent::DiscussionComment(e) => {
                discussion_comment(e, require_action(event, action)?)?
            }
            GithubEvent::RepositoryVulnerabilityAlert(e) => {
                vulnerability(e, require_action(event, action)?)
            }
        };
        Ok(line)
    }
}

/// mIRC colour for a severity bucket.
pub fn color_code(severity: Severity) -> &'static str {
    match severity {
        Severity::Created => "07",
        Severity::Closed | Severity::Merged => "13",
        Severity::Destructive => "04",
        Severity::Neutral => "09",
    }
}

// ── Formatting helpers ────────────────────────────────────────────────────────

fn colored(code: &str, text: &str) -> String {
    format!("{COLOR}{code}{text}{RESET}")
}

fn repo_name(repository: &Repository) -> String {
    colored("10", &escape_irc(&repository.name))
}

fn branch(name: &str) -> String {
    colored("06", &insert_zwj(&escape_irc(name)))
}

fn name(name: &str) -> String {
    colored("12", &insert_zwj(&escape_irc(name)))
}

fn action(action: &str) -> String {
    colored(color_code(Severity::of(action)), action)
}

fn number(text: &str) -> String {
    format!("{COLOR}12{BOLD}{text}{RESET}")
}

fn hash(text: &str) -> String {
    colored("14", text)
}

fn url(url: &str) -> String {
    colored("02", url)
}

fn title(text: &str) -> String {
    escape_irc(text)
}

fn body(text: Option<&str>) -> String {
    escape_irc(&short_message(text.unwrap_or_default(), DEFAULT_MESSAGE_LIMIT))
}

// ── Events ────────────────────────────────────────────────────────────────────

fn ping(e: &PingEvent) -> String {
    format!(
        "[{}] Hook {} worked! Zen: {}",
        repo_name(&e.repository),
        hash(&e.hook.id.to_string()),
        name(&e.zen)
    )
}

fn push(e: &PushEvent) -> Result<String, ConvertError> {
    let summary = PushSummary::new(e)?;
    let count = summary.count();

    let mut line = format!("[{}] {} ", repo_name(&e.repository), name(&e.pusher.name));

    match summary.kind {
        PushKind::Created { tag: true, base } => {
            let at = base.map_or_else(|| hash(e.after_sha()), branch);
            line.push_str(&format!("tagged {} at {}", branch(&e.ref_name), at));
        }
        PushKind::Created { tag: false, base } => {
            line.push_str(&format!("created {}", branch(&e.ref_name)));
            if let Some(base) = base {
                line.push_str(&format!(" from {}", branch(base)));
            } else if count > 0 {
                line.push_str(&format!(" at {}", hash(e.after_sha())));
            }
            if count > 0 {
                line.push_str(&format!(
                    " (+{} new {})",
                    number(&count.to_string()),
                    pluralize(count, "commit")
                ));
            }
        }
        PushKind::Forced => line.push_str(&format!(
            "{} {} from {} to {}",
            action(summary.action()),
            branch(&e.ref_name),
            hash(e.before_sha()),
            hash(e.after_sha())
        )),
        PushKind::Merge { base } => line.push_str(&format!(
            "merged {} into {}",
            branch(base),
            branch(&e.ref_name)
        )),
        PushKind::FastForward => line.push_str(&format!(
            "fast-forwarded {} from {} to {}",
            branch(&e.ref_name),
            hash(e.before_sha()),
            hash(e.after_sha())
        )),
        PushKind::Commits => line.push_str(&format!(
            "pushed {} new {} to {}",
            number(&count.to_string()),
            pluralize(count, "commit"),
            branch(&e.ref_name)
        )),
    }

    if count > 0 {
        let messages: Vec<String> = summary
            .recent()
            .map(|commit| escape_irc(&short_message(&commit.message, COMMIT_MESSAGE_LIMIT)))
            .collect();
        let joined = messages.join(&hash(" | "));
        line.push_str(&format!(": {}", short_message(&joined, COMMIT_LIST_LIMIT)));
    }

    line.push(' ');
    line.push_str(&url(&summary.url));
    Ok(line)
}

fn delete(e: &DeleteEvent, act: &str) -> String {
    format!(
        "[{}] {} {} {} {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        escape_irc(&e.ref_type),
        branch(&e.reference)
    )
}

fn public(e: &PublicEvent) -> String {
    format!(
        "[{}] is now open source and available to everyone at {} (You're the best {}!)",
        repo_name(&e.repository),
        url(e.repository.web_url().unwrap_or_default()),
        name(&e.sender.login)
    )
}

fn issues(e: &IssuesEvent, act: &str) -> String {
    format!(
        "[{}] {} {} issue {}: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        number(&format!("#{}", e.issue.number)),
        title(&e.issue.title),
        url(&e.issue.html_url)
    )
}

fn member(e: &MemberEvent, act: &str) -> String {
    format!(
        "[{}] {} {} {} as a collaborator",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        name(&e.member.login)
    )
}

fn gollum(e: &GollumEvent) -> Result<String, ConvertError> {
    if e.pages.is_empty() {
        return Err(ConvertError::missing_field("gollum", "pages"));
    }

    let lines: Vec<String> = e
        .pages
        .iter()
        .map(|page| {
            let summary = page
                .summary
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| format!("{} ", escape_irc(s)))
                .unwrap_or_default();
            format!(
                "[{}] {} {} {}: {}{}",
                repo_name(&e.repository),
                name(&e.sender.login),
                action(&page.action),
                title(&page.title),
                summary,
                url(&page.link())
            )
        })
        .collect();

    Ok(lines.join("\n"))
}

fn package(e: &PackageEvent, act: &str) -> String {
    format!(
        "[{}] {} {} {} package: {} {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        escape_irc(&e.package.package_type),
        title(&e.package.name),
        branch(&e.package.package_version.version),
        url(&e.package.html_url)
    )
}

fn project(e: &ProjectEvent, act: &str) -> String {
    format!(
        "[{}] {} {} project: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        title(&e.project.name),
        url(&e.project.html_url)
    )
}

fn release(e: &ReleaseEvent, act: &str) -> String {
    format!(
        "[{}] {} {} a {}release {}: {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        if e.release.prerelease { "pre-" } else { "" },
        branch(e.release.display_name()),
        url(&e.release.html_url)
    )
}

fn milestone(e: &MilestoneEvent, act: &str) -> String {
    format!(
        "[{}] {} {} milestone {}: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        number(&format!("#{}", e.milestone.number)),
        title(&e.milestone.title),
        url(&e.milestone.html_url)
    )
}

fn repository(e: &RepositoryEvent, act: &str) -> String {
    format!(
        "[{}] {} {} this repository. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        url(e.repository.web_url().unwrap_or_default())
    )
}

fn pull_request(e: &PullRequestEvent, act: &str) -> String {
    let pr = &e.pull_request;
    let merged_from = if act == "merged" {
        format!(" from {} to {}", name(&pr.user.login), branch(&pr.base.reference))
    } else {
        String::new()
    };

    format!(
        "[{}] {} {} {}pull request {}{}: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        if pr.draft { "draft " } else { "" },
        number(&format!("#{}", pr.number)),
        merged_from,
        title(&pr.title),
        url(&pr.html_url)
    )
}

fn issue_comment(e: &IssueCommentEvent, act: &str) -> Result<String, ConvertError> {
    match act {
        "created" => Ok(format!(
            "[{}] {} commented on {} {}: {} {}",
            repo_name(&e.repository),
            name(&e.sender.login),
            number(&format!("#{}", e.issue.number)),
            hash(&format!("({})", title(&e.issue.title))),
            body(e.comment.body.as_deref()),
            url(&e.comment.html_url)
        )),
        "deleted" => Ok(format!(
            "[{}] {} deleted comment in issue {} from {}",
            repo_name(&e.repository),
            name(&e.sender.login),
            number(&format!("#{}", e.issue.number)),
            name(&e.comment.user.login)
        )),
        other => Err(ConvertError::not_implemented("issue_comment", Some(other))),
    }
}

fn commit_comment(e: &CommitCommentEvent) -> String {
    format!(
        "[{}] {} commented on commit {}: {} {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        hash(short_sha(e.comment.commit_id.as_deref().unwrap_or_default())),
        body(e.comment.body.as_deref()),
        url(&e.comment.html_url)
    )
}

fn review(e: &PullRequestReviewEvent, act: &str) -> String {
    format!(
        "[{}] {} {} pull request {}: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        number(&format!("#{}", e.pull_request.number)),
        title(&e.pull_request.title),
        url(&e.review.html_url)
    )
}

fn review_comment(e: &PullRequestReviewCommentEvent) -> String {
    format!(
        "[{}] {} reviewed pull request {} at {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        number(&format!("#{}", e.pull_request.number)),
        hash(short_sha(e.comment.commit_id.as_deref().unwrap_or_default())),
        url(&e.comment.html_url)
    )
}

fn discussion(e: &DiscussionEvent, act: &str) -> String {
    format!(
        "[{}] {} {} discussion {}: {}. {}",
        repo_name(&e.repository),
        name(&e.sender.login),
        action(act),
        number(&format!("#{}", e.discussion.number)),
        title(&e.discussion.title),
        url(&e.discussion.html_url)
    )
}

fn discussion_comment(e: &DiscussionCommentEvent, act: &str) -> Result<String, ConvertError> {
    match act {
        "created" => Ok(format!(
            "[{}] {} commented on discussion {} {}: {} {}",
            repo_name(&e.repository),
            name(&e.sender.login),
            number(&format!("#{}", e.discussion.number)),
            hash(&format!("({})", title(&e.discussion.title))),
            body(e.comment.body.as_deref()),
            url(&e.comment.html_url)
        )),
        "deleted" => Ok(format!(
            "[{}] {} deleted comment in discussion {} from {}",
            repo_name(&e.repository),
            name(&e.sender.login),
            number(&format!("#{}", e.discussion.number)),
            name(&e.comment.user.login)
        )),
        other => Err(ConvertError::not_implemented("discussion_comment", Some(other))),
    }
}

fn vulnerability(e: &RepositoryVulnerabilityAlertEvent, act: &str) -> String {
    let alert = &e.alert;
    let headline = if act == "create" {
        "⚠ New vulnerability".to_string()
    } else {
        format!("Vulnerability {}", action(act))
    };

    format!(
        "[{}] {} for {}: {} {}",
        repo_name(&e.repository),
        headline,
        name(&alert.affected_package_name),
        number(&escape_irc(&alert.external_identifier)),
        url(&alert.external_reference)
    )
}
