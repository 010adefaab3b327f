//! Short identifiers: public addresses of stored records.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SlinkError};

/// Minimum accepted identifier length (git's default abbreviation).
pub const MIN_ID_LEN: usize = 7;

/// Maximum accepted identifier length (a full SHA-1 hex digest).
pub const MAX_ID_LEN: usize = 40;

/// A validated prefix of a record's content hash: 7-40 lowercase hex chars.
///
/// Validation happens before any lookup, so nothing malformed ever reaches a
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortId(String);

impl ShortId {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::InvalidInput` if the value is not 7-40 characters
    /// of `[0-9a-f]`.
    pub fn parse(value: &str) -> Result<Self> {
        let len = value.len();
        if !(MIN_ID_LEN..=MAX_ID_LEN).contains(&len) {
            return Err(SlinkError::InvalidInput(format!(
                "Identifier must be {}-{} hex characters (got {})",
                MIN_ID_LEN, MAX_ID_LEN, len
            )));
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(SlinkError::InvalidInput(
                "Identifier must be lowercase hex".to_string(),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Abbreviate a full commit hash to `len` characters (clamped to 7-40).
    pub fn abbreviate(full: &str, len: usize) -> Result<Self> {
        let len = len.clamp(MIN_ID_LEN, MAX_ID_LEN).min(full.len());
        let prefix = full.get(..len).ok_or_else(|| {
            SlinkError::InvalidInput(format!("Commit hash is not hex: {}", full))
        })?;
        Self::parse(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `full` is a hash this identifier abbreviates.
    pub fn matches(&self, full: &str) -> bool {
        full.starts_with(&self.0)
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortId {
    type Err = SlinkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
