//! GitHub-backed record store.
//!
//! Records are empty commits: the message rides on a commit that reuses its
//! parent's tree, so the repository's files never change. The commit SHA is
//! the record identifier, and the public `.patch` rendering of the commit is
//! what gets fetched back.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::traits::RecordStore;
use super::types::CommitRef;
use crate::config::GitHubSection;
use crate::error::{Result, SlinkError};
use crate::identifier::ShortId;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

pub struct GitHubStore {
    client: reqwest::Client,
    api_base: Url,
    web_base: Url,
    owner: String,
    repo: String,
    branch: String,
    token: SecretString,
}

#[derive(Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Deserialize)]
struct RefResponse {
    object: GitObject,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    #[serde(default)]
    tree: Option<GitObject>,
}

#[derive(Serialize)]
struct NewCommit<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
}

#[derive(Serialize)]
struct UpdateRef<'a> {
    sha: &'a str,
}

impl GitHubStore {
    /// Build a store from the `[github]` config section.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::Config` if owner, repo or token is missing, or a
    /// base URL does not parse.
    pub fn new(config: &GitHubSection) -> Result<Self> {
        let (owner, repo, token) = config.require()?;
        let web_url = config
            .web_url()
            .ok_or_else(|| SlinkError::Config("Missing GitHub web URL".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        let client = reqwest::Client::builder()
            .user_agent(format!("slink/{}", crate::VERSION))
            .default_headers(headers)
            .build()
            .map_err(|e| SlinkError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_base: parse_base(config.api_base_url())?,
            web_base: parse_base(&web_url)?,
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: config.branch().to_string(),
            token: SecretString::from(token.to_string()),
        })
    }

    fn api_url(&self, tail: &[&str]) -> Result<Url> {
        let mut segments = vec!["repos", self.owner.as_str(), self.repo.as_str(), "git"];
        segments.extend_from_slice(tail);
        join_segments(&self.api_base, &segments)
    }

    fn patch_url(&self, id: &ShortId) -> Result<Url> {
        let file = format!("{}.patch", id);
        join_segments(&self.web_base, &["commit", file.as_str()])
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        &self,
        step: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = ensure_success(step, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SlinkError::StorageUnavailable(format!("{}: bad response: {}", step, e)))
    }
}

#[async_trait]
impl RecordStore for GitHubStore {
    async fn create(&self, message: &str) -> Result<CommitRef> {
        let token = self.token.expose_secret();

        let url = self.api_url(&["ref", "heads", self.branch.as_str()])?;
        debug!(%url, "reading branch head");
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let head: RefResponse = self.read_json("read branch ref", response).await?;
        let parent = head.object.sha;

        let url = self.api_url(&["commits", parent.as_str()])?;
        debug!(%url, "reading parent commit");
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let parent_commit: CommitResponse =
            self.read_json("read parent commit", response).await?;
        let tree = parent_commit
            .tree
            .ok_or_else(|| {
                SlinkError::StorageUnavailable("read parent commit: missing tree".to_string())
            })?
            .sha;

        let url = self.api_url(&["commits"])?;
        debug!(%url, message_len = message.len(), "creating commit");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&NewCommit {
                message,
                tree: &tree,
                parents: [parent.as_str()],
            })
            .send()
            .await?;
        let created: CommitResponse = self.read_json("create commit", response).await?;

        let url = self.api_url(&["refs", "heads", self.branch.as_str()])?;
        debug!(%url, "advancing branch");
        let response = self
            .client
            .patch(url)
            .bearer_auth(token)
            .json(&UpdateRef { sha: &created.sha })
            .send()
            .await?;
        ensure_success("update branch ref", response).await?;

        info!(sha = %created.sha, branch = %self.branch, "record committed");
        Ok(CommitRef::new(created.sha))
    }

    async fn fetch(&self, id: &ShortId) -> Result<String> {
        let url = self.patch_url(id)?;
        debug!(%url, "fetching patch");
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SlinkError::NotFound(format!("No commit for {}", id)));
        }
        let response = ensure_success("fetch patch", response).await?;
        Ok(response.text().await?)
    }

    fn backend_name(&self) -> &'static str {
        "github"
    }
}

async fn ensure_success(
    step: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(step, %status, "GitHub request failed");
    Err(SlinkError::StorageUnavailable(format!(
        "{} failed with status {}: {}",
        step,
        status,
        body.chars().take(200).collect::<String>()
    )))
}

fn parse_base(value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| SlinkError::Config(format!("Invalid URL {}: {}", value, e)))?;
    if url.cannot_be_a_base() {
        return Err(SlinkError::Config(format!("Invalid base URL: {}", value)));
    }
    Ok(url)
}

/// Append percent-encoded path segments to a base URL.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SlinkError::Config(format!("Invalid base URL: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
