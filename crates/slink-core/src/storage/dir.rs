//! Local directory record store.
//!
//! Each record is one `<sha>.patch` file. Useful for self-hosting without a
//! git host and for exercising the full create/resolve path offline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::traits::RecordStore;
use super::types::{content_hash, format_patch, CommitRef};
use crate::error::{Result, SlinkError};
use crate::fs::write_atomic;
use crate::identifier::ShortId;

const PATCH_EXTENSION: &str = "patch";

#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn create_blocking(root: &Path, message: &str) -> Result<CommitRef> {
        fs::create_dir_all(root)?;
        let sha = content_hash(message);
        let path = root.join(format!("{}.{}", sha, PATCH_EXTENSION));
        if !path.exists() {
            write_atomic(&path, format_patch(&sha, message, Utc::now()).as_bytes())?;
        }
        Ok(CommitRef::new(sha))
    }

    fn fetch_blocking(root: &Path, id: &ShortId) -> Result<String> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SlinkError::NotFound(format!("No record for {}", id)));
            }
            Err(err) => return Err(err.into()),
        };

        let mut found: Option<PathBuf> = None;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PATCH_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !id.matches(stem) {
                continue;
            }
            if found.is_some() {
                return Err(SlinkError::NotFound(format!(
                    "Identifier {} is ambiguous",
                    id
                )));
            }
            found = Some(path);
        }

        let path = found.ok_or_else(|| SlinkError::NotFound(format!("No record for {}", id)))?;
        Ok(fs::read_to_string(path)?)
    }
}

#[async_trait]
impl RecordStore for DirStore {
    async fn create(&self, message: &str) -> Result<CommitRef> {
        let root = self.root.clone();
        let message = message.to_string();
        let commit = tokio::task::spawn_blocking(move || Self::create_blocking(&root, &message))
            .await
            .map_err(|e| SlinkError::StorageUnavailable(format!("Write task failed: {}", e)))??;
        debug!(sha = %commit.sha, root = %self.root.display(), "record written");
        Ok(commit)
    }

    async fn fetch(&self, id: &ShortId) -> Result<String> {
        let root = self.root.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || Self::fetch_blocking(&root, &id))
            .await
            .map_err(|e| SlinkError::StorageUnavailable(format!("Read task failed: {}", e)))?
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
