//! Payload fixtures shaped like real GitHub deliveries, trimmed to the
//! fields the renderers read.

#![allow(dead_code)]

use serde_json::{Value, json};

pub const REPO_URL: &str = "https://github.com/octo/hello-world";
pub const BEFORE: &str = "6113728f27ae82c7b1a177c8d03f9e96e0adf246";
pub const AFTER: &str = "0d1a26e67d8f5eaf1f6ba5c57fc3c7d91ac0fd1c";
pub const COMPARE_URL: &str = "https://github.com/octo/hello-world/compare/6113728f27ae...0d1a26e67d8f";

pub fn repository() -> Value {
    json!({
        "name": "hello-world",
        "full_name": "octo/hello-world",
        "html_url": REPO_URL,
        "url": REPO_URL,
        "owner": { "name": "octo", "login": "octo" }
    })
}

pub fn user(login: &str) -> Value {
    json!({
        "login": login,
        "html_url": format!("https://github.com/{login}"),
        "avatar_url": format!("https://avatars.githubusercontent.com/{login}")
    })
}

pub fn sender() -> Value {
    user("octocat")
}

/// Shallow merge of `extra` into `base`.
pub fn with(mut base: Value, extra: Value) -> Value {
    if let (Some(target), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    base
}

pub fn commit(id: &str, message: &str, author: &str) -> Value {
    json!({
        "id": id,
        "message": message,
        "url": format!("{REPO_URL}/commit/{id}"),
        "author": { "name": capitalize(author), "username": author },
        "distinct": true
    })
}

pub fn push(commits: Vec<Value>) -> Value {
    let head = commits.last().cloned();
    json!({
        "ref": "refs/heads/main",
        "before": BEFORE,
        "after": AFTER,
        "created": false,
        "deleted": false,
        "forced": false,
        "base_ref": null,
        "compare": COMPARE_URL,
        "commits": commits,
        "head_commit": head,
        "pusher": { "name": "octocat" },
        "repository": repository(),
        "sender": sender()
    })
}

pub fn issue(number: u64, title: &str, body: Option<&str>) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": body,
        "html_url": format!("{REPO_URL}/issues/{number}")
    })
}

pub fn issues(action: &str, issue: Value) -> Value {
    json!({
        "action": action,
        "issue": issue,
        "repository": repository(),
        "sender": sender()
    })
}

pub fn pull_request(number: u64, title: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": "Adds the feature.",
        "html_url": format!("{REPO_URL}/pull/{number}"),
        "draft": false,
        "merged": merged,
        "user": user("contributor"),
        "base": { "ref": "main", "sha": AFTER }
    })
}

pub fn pull_request_event(action: &str, pull_request: Value) -> Value {
    json!({
        "action": action,
        "pull_request": pull_request,
        "repository": repository(),
        "sender": sender()
    })
}

pub fn comment(body: &str, author: &str, url: &str) -> Value {
    json!({
        "body": body,
        "html_url": url,
        "commit_id": AFTER,
        "user": user(author)
    })
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
