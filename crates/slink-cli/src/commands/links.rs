use serde_json::json;
use slink_core::{Outcome, ShortId, SlinkError};

use crate::app::AppContext;
use crate::cli::{CreateArgs, OpenArgs, ResolveArgs};
use crate::errors::CliError;
use crate::helpers::{key_for_create, key_for_open, read_content};
use crate::output::{created_json, outcome_json, outcome_text, print_json};

pub async fn handle_create(ctx: &AppContext<'_>, args: &CreateArgs) -> anyhow::Result<()> {
    let content = read_content(args.content.clone())?;
    let key = key_for_create(args.key.clone())?;
    let (api, config) = ctx.api()?;

    let link = api
        .resolver()
        .create(&content, &key)
        .await
        .map_err(|err| match err {
            SlinkError::StorageUnavailable(message) => {
                anyhow::Error::new(CliError::StorageFailed(format!("Commit failed: {}", message)))
            }
            other => other.into(),
        })?;

    if ctx.json() {
        return print_json(&created_json(&link, config.git_repo().as_deref()));
    }
    if ctx.quiet() {
        println!("{}", link.short);
        return Ok(());
    }
    println!("Short:  {}", link.short);
    println!("Commit: {}", link.commit_hash);
    if let Some(repo) = config.git_repo() {
        println!("Repo:   {}", repo);
    }
    Ok(())
}

pub async fn handle_resolve(ctx: &AppContext<'_>, args: &ResolveArgs) -> anyhow::Result<()> {
    let id = parse_hash(&args.hash)?;
    let (api, _config) = ctx.api()?;

    let payload = match api.resolver().payload(&id).await {
        Ok(payload) => payload,
        Err(SlinkError::NotFound(_)) => return Err(not_found(&id).into()),
        Err(err) => return Err(err.into()),
    };

    if ctx.json() {
        return print_json(&json!({ "hash": id.as_str(), "payload": payload }));
    }
    println!("{}", payload);
    Ok(())
}

pub async fn handle_open(ctx: &AppContext<'_>, args: &OpenArgs) -> anyhow::Result<()> {
    let id = parse_hash(&args.hash)?;
    let (api, _config) = ctx.api()?;
    let key = key_for_open(args.key.clone())?;

    let outcome = api.resolver().resolve(&id, &key).await?;
    match &outcome {
        Outcome::AccessDenied => {
            return Err(CliError::auth_failed_with_hint(
                format!("Link {} did not open with this key", id),
                "Hint: Keys are case-sensitive. Pass --key or set SLINK_KEY.",
            )
            .into());
        }
        Outcome::Unresolvable => return Err(not_found(&id).into()),
        Outcome::RedirectTo(_) | Outcome::Content(_) => {}
    }

    if ctx.json() {
        return print_json(&outcome_json(&outcome));
    }
    if let Some(text) = outcome_text(&outcome) {
        println!("{}", text);
    }
    Ok(())
}

fn parse_hash(hash: &str) -> anyhow::Result<ShortId> {
    ShortId::parse(hash.trim()).map_err(|e| CliError::invalid_input(e.to_string()).into())
}

fn not_found(id: &ShortId) -> CliError {
    CliError::not_found(
        format!("No link found for {}", id),
        "Hint: Check the hash; it must be 7-40 lowercase hex characters of an existing commit.",
    )
}
