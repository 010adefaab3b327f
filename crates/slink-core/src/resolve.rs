//! Resolution engine.
//!
//! Turns a (short identifier, key) pair into an [`Outcome`]:
//!
//! ```text
//! fetch -> extract -> PlainUrl ------------------------------> RedirectTo
//!                  -> Envelope -> decode -> open -> classify -> RedirectTo | Content
//!                  -> NotFound
//! ```
//!
//! Fetch, parse and decode failures all collapse into `Unresolvable`, so a
//! caller cannot tell a missing record from a corrupt one. A record that
//! parses but will not open under the key is `AccessDenied`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SlinkConfig;
use crate::crypto::{self, validate_passphrase};
use crate::envelope::Envelope;
use crate::error::{Result, SlinkError};
use crate::identifier::ShortId;
use crate::patch::{self, ParsedDirective};
use crate::storage::RecordStore;

/// Result of resolving an identifier with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Legacy URL record, or decrypted content that is itself a URL.
    RedirectTo(String),
    /// Decrypted content that is not a URL.
    Content(String),
    /// The record exists but does not open under this key.
    AccessDenied,
    /// Missing, unparsable, or malformed record.
    Unresolvable,
}

/// Identifiers handed back after a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub short: ShortId,
    pub commit_hash: String,
}

pub struct Resolver {
    store: Arc<dyn RecordStore>,
    short_len: usize,
}

impl Resolver {
    pub fn new(store: Arc<dyn RecordStore>, config: &SlinkConfig) -> Self {
        Self {
            store,
            short_len: config.short_len(),
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Encrypt `content` under `key` and store it as a new record.
    ///
    /// # Errors
    ///
    /// - `SlinkError::InvalidInput` if content or key is empty
    /// - `SlinkError::StorageUnavailable` if the store rejects the write or
    ///   hands back an identifier that is not hex
    pub async fn create(&self, content: &str, key: &str) -> Result<CreatedLink> {
        if content.is_empty() {
            return Err(SlinkError::InvalidInput("Content is empty".to_string()));
        }
        validate_passphrase(key)?;

        let envelope = {
            let content = content.to_string();
            let key = key.to_string();
            blocking(move || crypto::seal(&content, &key)).await?
        };
        let message = patch::commit_message(&envelope.encode()?);

        debug!(backend = self.store.backend_name(), "storing record");
        let commit = self.store.create(&message).await?;
        // The record is already written; a bad id here is the store's fault.
        let short = commit.short(self.short_len).map_err(|e| {
            SlinkError::StorageUnavailable(format!("Store returned id {:?}: {}", commit.sha, e))
        })?;
        info!(short = %short, "link created");

        Ok(CreatedLink {
            short,
            commit_hash: commit.sha,
        })
    }

    /// Raw directive payload of a record, before any decryption.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::NotFound` if the record is missing or carries no
    /// directive, or the store's error if it could not be reached.
    pub async fn payload(&self, id: &ShortId) -> Result<String> {
        let text = self.store.fetch(id).await?;
        match patch::extract(&text) {
            ParsedDirective::PlainUrl(payload) | ParsedDirective::Envelope(payload) => {
                Ok(payload)
            }
            ParsedDirective::NotFound => {
                Err(SlinkError::NotFound(format!("No payload in record {}", id)))
            }
        }
    }

    /// Resolve `id` with `key`.
    ///
    /// # Errors
    ///
    /// Only if the worker running the decryption fails; every record state
    /// maps to an [`Outcome`].
    pub async fn resolve(&self, id: &ShortId, key: &str) -> Result<Outcome> {
        let text = match self.store.fetch(id).await {
            Ok(text) => text,
            Err(SlinkError::NotFound(reason)) => {
                debug!(%id, %reason, "record not found");
                return Ok(Outcome::Unresolvable);
            }
            Err(err) => {
                warn!(%id, error = %err, "record fetch failed");
                return Ok(Outcome::Unresolvable);
            }
        };

        let json = match patch::extract(&text) {
            ParsedDirective::PlainUrl(url) => {
                debug!(%id, "legacy url record");
                return Ok(Outcome::RedirectTo(url));
            }
            ParsedDirective::Envelope(json) => json,
            ParsedDirective::NotFound => {
                debug!(%id, "no directive in record");
                return Ok(Outcome::Unresolvable);
            }
        };

        let envelope = match Envelope::decode(&json) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!(%id, error = %err, "envelope rejected");
                return Ok(Outcome::Unresolvable);
            }
        };

        let key = key.to_string();
        match blocking(move || crypto::open(&envelope, &key)).await {
            Ok(plaintext) if is_url(&plaintext) => Ok(Outcome::RedirectTo(plaintext)),
            Ok(plaintext) => Ok(Outcome::Content(plaintext)),
            Err(err) if err.is_access_denied() => {
                debug!(%id, error = %err, "envelope did not open");
                Ok(Outcome::AccessDenied)
            }
            Err(SlinkError::InvalidInput(_)) => Ok(Outcome::AccessDenied),
            Err(err) => Err(err),
        }
    }
}

/// `http://` or `https://`, scheme compared case-insensitively.
pub fn is_url(text: &str) -> bool {
    match text.split_once("://") {
        Some((scheme, _)) => {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        None => false,
    }
}

/// Run CPU-bound key derivation off the async worker threads.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| SlinkError::Crypto(format!("Crypto task failed: {}", e)))?
}
