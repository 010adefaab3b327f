//! Config file loading for the CLI.
//!
//! The file holds a `SlinkConfig` in TOML. Environment overrides are applied
//! here and nowhere else; the core only ever sees the finished value.

use std::path::{Path, PathBuf};

use slink_core::SlinkConfig;

use crate::constants::env;

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Default record directory for the local backend.
pub fn default_local_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("records"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SlinkConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &SlinkConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

/// Overlay `GITHUB_TOKEN` and the `SLINK_REPO_*` variables onto `config`.
///
/// `lookup` is `std::env::var` in production; blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut SlinkConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(token) = get(env::GITHUB_TOKEN) {
        config.github.token = Some(token);
    }
    if let Some(owner) = get(env::REPO_OWNER) {
        config.github.owner = Some(owner);
    }
    if let Some(repo) = get(env::REPO_NAME) {
        config.github.repo = Some(repo);
    }
    if let Some(branch) = get(env::REPO_BRANCH) {
        config.github.branch = Some(branch);
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("slink"));
        }
    }
    Ok(home_dir()?.join(".config").join("slink"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("slink"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("slink"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
