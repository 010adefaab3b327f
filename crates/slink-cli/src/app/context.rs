//! Application context for the slink CLI.
//!
//! Bundles the parsed arguments with config loading, so handlers take one
//! parameter instead of threading flags and paths around.

use std::path::PathBuf;

use slink_core::{Api, SlinkConfig};

use crate::cli::Cli;
use crate::config::{apply_env_overrides, read_config};
use crate::errors::CliError;

use super::paths::{missing_config_message, resolve_config_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Check if JSON output is requested.
    pub fn json(&self) -> bool {
        self.cli.json
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli)
    }

    /// Load the config file and apply environment overrides.
    ///
    /// A missing file is tolerated when the environment alone configures the
    /// GitHub backend.
    pub fn load_config(&self) -> anyhow::Result<SlinkConfig> {
        let path = self.config_path()?;
        let file_exists = path.exists();
        let mut config = if file_exists {
            read_config(&path)?
        } else {
            SlinkConfig::default()
        };
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        if !file_exists && config.validate().is_err() {
            return Err(CliError::not_found(
                missing_config_message(&path),
                "Hint: Run `slink init --help` for backend options.",
            )
            .into());
        }
        config.validate()?;
        tracing::debug!(path = %path.display(), backend = ?config.storage.backend, "config loaded");
        Ok(config)
    }

    /// Build the request handlers over the configured store.
    pub fn api(&self) -> anyhow::Result<(Api, SlinkConfig)> {
        let config = self.load_config()?;
        let api = Api::from_config(&config)?;
        Ok((api, config))
    }
}
