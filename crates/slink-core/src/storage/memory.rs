//! In-process record store.
//!
//! Content-addressed like the other backends and rendered as patch text, so
//! resolution code cannot tell it apart from a real repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::traits::RecordStore;
use super::types::{content_hash, format_patch, CommitRef};
use crate::error::{Result, SlinkError};
use crate::identifier::ShortId;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with verbatim patch text (e.g. a legacy URL record).
    pub fn insert_raw(&self, sha: impl Into<String>, patch_text: impl Into<String>) {
        self.records.write().insert(sha.into(), patch_text.into());
    }

    /// Raw text of the record with exactly this full identifier.
    pub fn get(&self, sha: &str) -> Option<String> {
        self.records.read().get(sha).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, message: &str) -> Result<CommitRef> {
        let sha = content_hash(message);
        let text = format_patch(&sha, message, Utc::now());
        self.records.write().entry(sha.clone()).or_insert(text);
        Ok(CommitRef::new(sha))
    }

    async fn fetch(&self, id: &ShortId) -> Result<String> {
        let records = self.records.read();
        let mut matches = records
            .range(id.as_str().to_string()..)
            .take_while(|(sha, _)| id.matches(sha));

        match (matches.next(), matches.next()) {
            (Some((_, text)), None) => Ok(text.clone()),
            (Some(_), Some(_)) => Err(SlinkError::NotFound(format!(
                "Identifier {} is ambiguous",
                id
            ))),
            (None, _) => Err(SlinkError::NotFound(format!("No record for {}", id))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// A store that is always down, or that answers with a bogus identifier.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) enum BrokenStore {
    Unreachable,
    BadId,
}

#[cfg(test)]
#[async_trait]
impl RecordStore for BrokenStore {
    async fn create(&self, _message: &str) -> Result<CommitRef> {
        match self {
            BrokenStore::Unreachable => Err(SlinkError::StorageUnavailable(
                "connection refused".to_string(),
            )),
            BrokenStore::BadId => Ok(CommitRef::new("not-a-commit")),
        }
    }

    async fn fetch(&self, _id: &ShortId) -> Result<String> {
        Err(SlinkError::StorageUnavailable("connection refused".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_fetch_by_prefix() {
        let store = MemoryStore::new();
        let commit = store.create("slink:{\"v\":1}").await.unwrap();

        let id = commit.short(7).unwrap();
        let text = store.fetch(&id).await.unwrap();
        assert!(text.contains("Subject: [PATCH] slink:{\"v\":1}"));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let store = MemoryStore::new();
        let id = ShortId::parse("deadbee").unwrap();
        assert!(matches!(
            store.fetch(&id).await,
            Err(SlinkError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ambiguous_prefix_is_not_found() {
        let store = MemoryStore::new();
        store.insert_raw("abcdef0111", "Subject: [PATCH] https://one.example");
        store.insert_raw("abcdef0222", "Subject: [PATCH] https://two.example");

        let ambiguous = ShortId::parse("abcdef0").unwrap();
        assert!(matches!(
            store.fetch(&ambiguous).await,
            Err(SlinkError::NotFound(_))
        ));

        let exact = ShortId::parse("abcdef02").unwrap();
        assert!(store.fetch(&exact).await.unwrap().contains("two.example"));
    }

    #[tokio::test]
    async fn test_records_are_immutable() {
        let store = MemoryStore::new();
        let first = store.create("slink:{}").await.unwrap();
        let original = store.get(&first.sha).unwrap();

        let second = store.create("slink:{}").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get(&first.sha).unwrap(), original);
        assert_eq!(store.len(), 1);
    }
}
