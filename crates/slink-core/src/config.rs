//! Process configuration.
//!
//! Built once at startup (the CLI reads it from TOML and environment) and then
//! passed by reference into store and resolver constructors. Nothing in the
//! core reads the environment itself.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlinkError};
use crate::identifier::{MAX_ID_LEN, MIN_ID_LEN};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_SHORT_LEN: usize = MIN_ID_LEN;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlinkConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub local: LocalSection,
    #[serde(default)]
    pub links: LinksSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Github,
    Local,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GitHubSection {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    /// Personal access token with contents:write on the repository.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    pub api_base_url: Option<String>,
    /// Public web URL of the repository, where `commit/<hash>.patch` lives.
    pub web_url: Option<String>,
}

impl std::fmt::Debug for GitHubSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSection")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .field("web_url", &self.web_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSection {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksSection {
    /// Length of the `short` identifier handed back on create.
    pub short_len: Option<usize>,
    /// Where unresolvable redirect requests are sent, if anywhere.
    pub fallback_url: Option<String>,
}

impl GitHubSection {
    pub fn branch(&self) -> &str {
        non_empty(&self.branch).unwrap_or(DEFAULT_BRANCH)
    }

    pub fn api_base_url(&self) -> &str {
        non_empty(&self.api_base_url)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    /// Owner, repo and token, or a `Config` error naming what is missing.
    pub fn require(&self) -> Result<(&str, &str, &str)> {
        let mut missing = Vec::new();
        let owner = non_empty(&self.owner);
        let repo = non_empty(&self.repo);
        let token = non_empty(&self.token);
        if owner.is_none() {
            missing.push("github.owner");
        }
        if repo.is_none() {
            missing.push("github.repo");
        }
        if token.is_none() {
            missing.push("github.token");
        }
        match (owner, repo, token) {
            (Some(owner), Some(repo), Some(token)) => Ok((owner, repo, token)),
            _ => Err(SlinkError::Config(format!(
                "Missing GitHub settings: {}",
                missing.join(", ")
            ))),
        }
    }

    /// Repository web URL, derived from owner/repo when not set explicitly.
    pub fn web_url(&self) -> Option<String> {
        if let Some(url) = non_empty(&self.web_url) {
            return Some(url.trim_end_matches('/').to_string());
        }
        match (non_empty(&self.owner), non_empty(&self.repo)) {
            (Some(owner), Some(repo)) => Some(format!("https://github.com/{}/{}", owner, repo)),
            _ => None,
        }
    }
}

impl SlinkConfig {
    /// A config for the local directory backend.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageSection {
                backend: StorageBackend::Local,
            },
            local: LocalSection {
                path: Some(path.into()),
            },
            ..Self::default()
        }
    }

    pub fn short_len(&self) -> usize {
        self.links
            .short_len
            .unwrap_or(DEFAULT_SHORT_LEN)
            .clamp(MIN_ID_LEN, MAX_ID_LEN)
    }

    pub fn fallback_url(&self) -> Option<&str> {
        non_empty(&self.links.fallback_url)
    }

    /// Repository location reported back to clients after a create.
    pub fn git_repo(&self) -> Option<String> {
        match self.storage.backend {
            StorageBackend::Github => self.github.web_url(),
            StorageBackend::Local => self
                .local
                .path
                .as_ref()
                .map(|path| path.display().to_string()),
        }
    }

    /// Check that the selected backend has everything it needs.
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::Github => self.github.require().map(|_| ()),
            StorageBackend::Local => match &self.local.path {
                Some(path) if !path.as_os_str().is_empty() => Ok(()),
                _ => Err(SlinkError::Config(
                    "Missing local storage path: local.path".to_string(),
                )),
            },
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SlinkConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Github);
        assert_eq!(config.github.branch(), "main");
        assert_eq!(config.github.api_base_url(), "https://api.github.com");
        assert_eq!(config.short_len(), 7);
        assert!(config.fallback_url().is_none());
    }

    #[test]
    fn test_github_requires_owner_repo_token() {
        let mut config = SlinkConfig::default();
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("github.owner"));
        assert!(message.contains("github.repo"));
        assert!(message.contains("github.token"));

        config.github.owner = Some("octo".into());
        config.github.repo = Some("links".into());
        config.github.token = Some("  ".into());
        assert!(config.validate().is_err());

        config.github.token = Some("ghp_x".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_web_url_derivation() {
        let mut github = GitHubSection {
            owner: Some("octo".into()),
            repo: Some("links".into()),
            ..GitHubSection::default()
        };
        assert_eq!(
            github.web_url().as_deref(),
            Some("https://github.com/octo/links")
        );

        github.web_url = Some("https://git.example/octo/links/".into());
        assert_eq!(
            github.web_url().as_deref(),
            Some("https://git.example/octo/links")
        );
    }

    #[test]
    fn test_short_len_clamped() {
        let mut config = SlinkConfig::default();
        config.links.short_len = Some(4);
        assert_eq!(config.short_len(), 7);
        config.links.short_len = Some(64);
        assert_eq!(config.short_len(), 40);
        config.links.short_len = Some(12);
        assert_eq!(config.short_len(), 12);
    }

    #[test]
    fn test_local_requires_path() {
        assert!(SlinkConfig::local("/tmp/slink").validate().is_ok());
        let mut config = SlinkConfig::local("");
        assert!(config.validate().is_err());
        config.local.path = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let github = GitHubSection {
            token: Some("ghp_supersecret".into()),
            ..GitHubSection::default()
        };
        let debug = format!("{:?}", github);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ghp_supersecret"));
    }

    #[test]
    fn test_token_never_serialized() {
        let mut config = SlinkConfig::default();
        config.github.token = Some("ghp_supersecret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_supersecret"));
    }
}
