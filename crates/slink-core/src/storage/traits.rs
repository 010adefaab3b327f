//! Record store trait definition.
//!
//! The `RecordStore` trait is the whole contract the resolver needs from the
//! place records live: write an immutable text record, read one back by
//! identifier. Backends (hosted git, a local directory, memory) differ only in
//! where the bytes go.

use async_trait::async_trait;

use super::types::CommitRef;
use crate::error::Result;
use crate::identifier::ShortId;

/// Immutable, content-addressed record storage.
///
/// All implementations must ensure:
/// - Records are never updated or deleted once created
/// - Identifiers are derived from record content
/// - `fetch` returns patch-shaped text containing the record's subject line
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Durably store `message` as a new record.
    ///
    /// # Returns
    ///
    /// Returns the full content-derived identifier of the new record.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::StorageUnavailable` on network, auth or API failure.
    async fn create(&self, message: &str) -> Result<CommitRef>;

    /// Fetch the raw patch text of the record addressed by `id`.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::NotFound` if no record matches `id`, or
    /// `SlinkError::StorageUnavailable` if the store cannot be reached.
    async fn fetch(&self, id: &ShortId) -> Result<String>;

    /// Short human-readable backend name for logs.
    fn backend_name(&self) -> &'static str;
}
