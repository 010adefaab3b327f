//! Link key validation.
//!
//! Link keys are intentionally short (they travel in URLs), so the only
//! requirement is that one was actually supplied. Keys are used verbatim:
//! a key of spaces is still a key.

use crate::error::{Result, SlinkError};

/// Validate a link key before sealing content with it.
///
/// # Requirements
///
/// - Not empty
///
/// # Examples
///
/// ```
/// use slink_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("ab12").is_ok());
/// assert!(validate_passphrase("").is_err());
/// assert!(validate_passphrase("  ").is_ok());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.is_empty() {
        return Err(SlinkError::InvalidInput("Key cannot be empty".to_string()));
    }

    Ok(())
}
