//! Envelope cipher: AES-256-GCM under a PBKDF2-derived key.
//!
//! Every call to [`seal`] draws a fresh salt and nonce from the OS entropy
//! source, so a (key, nonce) pair is never reused.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::key::{derive_key, SALT_LEN};
use super::passphrase::validate_passphrase;
use crate::envelope::{Envelope, ENVELOPE_VERSION};
use crate::error::{Result, SlinkError};

/// Algorithm identifier written into every envelope.
pub const ALGORITHM: &str = "AES-GCM";

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (appended to the ciphertext).
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `passphrase`.
///
/// # Errors
///
/// Returns `SlinkError::InvalidInput` for an empty key, and
/// `SlinkError::Crypto` if the OS entropy source fails.
///
/// # Examples
///
/// ```
/// use slink_core::crypto::{open, seal};
///
/// let envelope = seal("hello", "ab12").unwrap();
/// assert_eq!(open(&envelope, "ab12").unwrap(), "hello");
/// ```
pub fn seal(plaintext: &str, passphrase: &str) -> Result<Envelope> {
    validate_passphrase(passphrase)?;

    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .and_then(|_| OsRng.try_fill_bytes(&mut nonce))
        .map_err(|e| SlinkError::Crypto(format!("Entropy source failed: {}", e)))?;

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| SlinkError::Crypto("Encryption failed".to_string()))?;

    Ok(Envelope {
        version: ENVELOPE_VERSION,
        algorithm: ALGORITHM.to_string(),
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt an envelope with `passphrase`.
///
/// Trailing whitespace is trimmed from the recovered text; older records may
/// carry a trailing newline from the original submission.
///
/// # Errors
///
/// - `SlinkError::UnsupportedVersion` if the envelope is not version 1
/// - `SlinkError::UnsupportedAlgorithm` if the envelope names another cipher
/// - `SlinkError::AuthenticationFailure` if the tag does not verify
pub fn open(envelope: &Envelope, passphrase: &str) -> Result<String> {
    if envelope.version != ENVELOPE_VERSION {
        return Err(SlinkError::UnsupportedVersion(envelope.version));
    }
    if envelope.algorithm != ALGORITHM {
        return Err(SlinkError::UnsupportedAlgorithm(envelope.algorithm.clone()));
    }

    let key = derive_key(passphrase, &envelope.salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| SlinkError::AuthenticationFailure)?;

    Ok(String::from_utf8_lossy(&plaintext).trim_end().to_string())
}
