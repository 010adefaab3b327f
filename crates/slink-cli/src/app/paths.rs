//! Path resolution for the config file.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::default_config_path;

/// Resolve the config file path: `--config` / `SLINK_CONFIG`, else the XDG
/// default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.config {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
        _ => default_config_path(),
    }
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No slink config found at {}\n\nRun:\n  slink init\n\nOr point at one:\n  SLINK_CONFIG=/path/to/config.toml slink ...",
        config_path.display()
    )
}
