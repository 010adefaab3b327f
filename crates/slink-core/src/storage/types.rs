//! Types shared by the record store backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::identifier::{ShortId, MAX_ID_LEN};

/// Reference to a created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Full hex identifier (a commit SHA for git-backed stores).
    pub sha: String,
}

impl CommitRef {
    pub fn new(sha: impl Into<String>) -> Self {
        Self { sha: sha.into() }
    }

    /// Abbreviated identifier, `len` characters long (clamped to 7-40).
    pub fn short(&self, len: usize) -> Result<ShortId> {
        ShortId::abbreviate(&self.sha, len)
    }
}

/// Content-derived identifier for stores that do not have git to hash for
/// them: the first 40 hex digits of SHA-256 over the message.
pub fn content_hash(message: &str) -> String {
    let digest = Sha256::digest(message.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(MAX_ID_LEN);
    hex
}

/// Render a record the way `git format-patch` renders an empty commit.
///
/// The first line of `message` becomes the subject; any further lines become
/// the body.
pub fn format_patch(sha: &str, message: &str, date: DateTime<Utc>) -> String {
    let (subject, body) = match message.split_once('\n') {
        Some((subject, body)) => (subject, body.trim_matches('\n')),
        None => (message, ""),
    };

    let mut out = format!(
        "From {} Mon Sep 17 00:00:00 2001\n\
         From: slink <slink@localhost>\n\
         Date: {}\n\
         Subject: [PATCH] {}\n\n",
        sha,
        date.to_rfc2822(),
        subject
    );
    if !body.is_empty() {
        out.push_str(body);
        out.push_str("\n\n");
    }
    out.push_str("---\n\n--\nslink ");
    out.push_str(crate::VERSION);
    out.push('\n');
    out
}
