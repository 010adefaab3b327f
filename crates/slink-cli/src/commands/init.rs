use std::io::IsTerminal;

use dialoguer::Input;
use serde_json::json;
use slink_core::SlinkConfig;

use crate::app::AppContext;
use crate::cli::{BackendArg, InitArgs};
use crate::config::{default_local_path, write_config};
use crate::constants::env;
use crate::errors::CliError;
use crate::output::print_json;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let path = ctx.config_path()?;
    if path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Pass --force to overwrite it.",
            path.display()
        ))
        .into());
    }

    let interactive = std::io::stdin().is_terminal() && !ctx.json();
    let config = build_config(args, interactive)?;
    write_config(&path, &config)?;
    tracing::info!(path = %path.display(), "config written");

    if ctx.json() {
        return print_json(&json!({
            "config": path.display().to_string(),
            "backend": backend_name(args.backend),
            "gitRepo": config.git_repo(),
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    println!("Wrote config to {}", path.display());
    match args.backend {
        BackendArg::Local => {
            if let Some(records) = &config.local.path {
                println!("Records will be stored in {}", records.display());
            }
        }
        BackendArg::Github => {
            println!(
                "Set {} to a token with contents:write on the repository.",
                env::GITHUB_TOKEN
            );
        }
    }
    Ok(())
}

fn build_config(args: &InitArgs, interactive: bool) -> anyhow::Result<SlinkConfig> {
    match args.backend {
        BackendArg::Local => {
            let records = match &args.local_path {
                Some(path) => path.clone(),
                None => default_local_path()?,
            };
            Ok(SlinkConfig::local(records))
        }
        BackendArg::Github => {
            let mut config = SlinkConfig::default();
            config.github.owner = value_or_prompt(args.owner.clone(), "Repository owner", interactive)?;
            config.github.repo = value_or_prompt(args.repo.clone(), "Repository name", interactive)?;
            config.github.branch = args.branch.clone();
            Ok(config)
        }
    }
}

/// Flag value if given, else a prompt on a TTY, else unset (the environment
/// may supply it later).
fn value_or_prompt(
    value: Option<String>,
    prompt: &str,
    interactive: bool,
) -> anyhow::Result<Option<String>> {
    if value.is_some() || !interactive {
        return Ok(value);
    }
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn backend_name(backend: BackendArg) -> &'static str {
    match backend {
        BackendArg::Github => "github",
        BackendArg::Local => "local",
    }
}
