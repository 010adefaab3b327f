//! Record storage for slink.
//!
//! This module defines the `RecordStore` trait and the backends that hold
//! link records.
//!
//! ## Architecture
//!
//! The resolver only ever creates a record or fetches one back by short
//! identifier, so the storage layer is backend-agnostic:
//! - `github`: empty commits on a hosted repository (the production backend)
//! - `dir`: one patch file per record in a local directory
//! - `memory`: in-process map, for tests and dry runs
//!
//! Every backend hands back `git format-patch` shaped text, which is what the
//! patch parser expects.

pub mod dir;
pub mod github;
pub mod memory;
pub mod traits;
pub mod types;

use std::sync::Arc;

use crate::config::{SlinkConfig, StorageBackend};
use crate::error::{Result, SlinkError};

// Re-export public types
pub use dir::DirStore;
pub use github::GitHubStore;
pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use memory::BrokenStore;
pub use traits::RecordStore;
pub use types::{content_hash, format_patch, CommitRef};

/// Build the store selected by `config.storage.backend`.
///
/// # Errors
///
/// Returns `SlinkError::Config` if the selected backend is missing settings.
pub fn open_store(config: &SlinkConfig) -> Result<Arc<dyn RecordStore>> {
    config.validate()?;
    match config.storage.backend {
        StorageBackend::Github => Ok(Arc::new(GitHubStore::new(&config.github)?)),
        StorageBackend::Local => {
            let path = config
                .local
                .path
                .clone()
                .ok_or_else(|| SlinkError::Config("Missing local.path".to_string()))?;
            Ok(Arc::new(DirStore::new(path)))
        }
    }
}
