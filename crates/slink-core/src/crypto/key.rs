//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! Link keys are short and human-typeable, so the derivation is deliberately
//! slow. The parameters are part of the stored format: changing them makes
//! every existing envelope unreadable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, SlinkError};

/// PBKDF2 iteration count for envelope version 1.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Length of a per-envelope salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// A cryptographic key derived from a link key.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a link key and salt.
///
/// # Arguments
///
/// * `passphrase` - The link key as typed by the user (UTF-8 bytes are used)
/// * `salt` - Random salt, stored alongside the ciphertext
///
/// # Security
///
/// - Same passphrase + salt always produces the same key
/// - Different salt produces a different key
/// - 100,000 iterations rate-limit offline guessing
///
/// # Examples
///
/// ```
/// use slink_core::crypto::derive_key;
///
/// let salt = [7u8; 16];
/// let key = derive_key("ab12", &salt).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(SlinkError::InvalidInput(format!(
            "Salt must be exactly {} bytes (got {})",
            SALT_LEN,
            salt.len()
        )));
    }

    Ok(derive_with_rounds(passphrase, salt, KDF_ITERATIONS))
}

pub(crate) fn derive_with_rounds(passphrase: &str, salt: &[u8], rounds: u32) -> DerivedKey {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, rounds, &mut key_bytes);
    let key = DerivedKey::from_bytes(key_bytes);
    zeroize::Zeroize::zeroize(&mut key_bytes);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answer_vector() {
        // Published PBKDF2-HMAC-SHA256 vector, c = 1
        let key = derive_with_rounds("password", b"salt", 1);
        assert_eq!(
            hex::encode(key.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = [1u8; SALT_LEN];

        let key1 = derive_key("ab12", &salt).unwrap();
        let key2 = derive_key("ab12", &salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("ab12", &[1u8; SALT_LEN]).unwrap();
        let key2 = derive_key("ab12", &[2u8; SALT_LEN]).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = [3u8; SALT_LEN];

        let key1 = derive_key("passphrase-one", &salt).unwrap();
        let key2 = derive_key("passphrase-two", &salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_wrong_salt_length_rejected() {
        let result = derive_key("ab12", b"short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Salt must be exactly 16 bytes"));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("ab12", &[4u8; SALT_LEN]).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
