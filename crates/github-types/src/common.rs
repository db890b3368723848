//! Records shared by several webhook payloads

use serde::{Deserialize, Serialize};

/// GitHub account that triggered an event (`sender`, `member`, authors of comments).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Owner block of a repository. Push payloads carry `name`, everything else `login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepositoryOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// Repository the event belongs to.
///
/// Organisation-scoped events get a synthesised record during normalization,
/// so every typed event has one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub owner: RepositoryOwner,
}

impl Repository {
    /// `owner/name`, preferring the payload's own `full_name`.
    pub fn full_name(&self) -> String {
        if let Some(full_name) = &self.full_name {
            return full_name.clone();
        }
        let owner = self
            .owner
            .name
            .as_deref()
            .or(self.owner.login.as_deref())
            .unwrap_or_default();
        format!("{}/{}", owner, self.name)
    }

    /// Browser URL of the repository.
    ///
    /// Push payloads put the browser URL in `url`, the API URL everywhere else,
    /// so `html_url` wins when present.
    pub fn web_url(&self) -> Option<&str> {
        self.html_url.as_deref().or(self.url.as_deref())
    }
}

/// Organisation block of org-level hooks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub login: String,
}

/// Author or committer of a pushed commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Commit as listed in a push payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: String,
    pub author: CommitAuthor,
    /// Absent means distinct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct: Option<bool>,
}

impl Commit {
    /// Distinct and carrying a non-empty message.
    pub fn is_distinct(&self) -> bool {
        self.distinct != Some(false) && !self.message.is_empty()
    }

    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Branch reference on either side of a pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Comment on a commit, issue, pull request diff or discussion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    pub user: User,
}

/// First six characters of a commit hash.
pub fn short_sha(hash: &str) -> &str {
    match hash.char_indices().nth(6) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}
