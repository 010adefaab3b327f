//! Output formatting helpers for the CLI.

use serde_json::{json, Value};
use slink_core::{CreatedLink, Outcome};

/// JSON for a freshly created link. Field names match the HTTP create
/// response.
pub fn created_json(link: &CreatedLink, git_repo: Option<&str>) -> Value {
    json!({
        "short": link.short.as_str(),
        "commitHash": link.commit_hash,
        "gitRepo": git_repo,
    })
}

/// JSON for an opened link.
pub fn outcome_json(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::RedirectTo(url) => json!({ "kind": "redirect", "url": url }),
        Outcome::Content(content) => json!({ "kind": "content", "content": content }),
        Outcome::AccessDenied => json!({ "kind": "access_denied" }),
        Outcome::Unresolvable => json!({ "kind": "not_found" }),
    }
}

/// Human-readable line for an opened link.
pub fn outcome_text(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::RedirectTo(url) => Some(format!("redirect: {}", url)),
        Outcome::Content(content) => Some(content.clone()),
        Outcome::AccessDenied | Outcome::Unresolvable => None,
    }
}

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
