//! Cryptographic operations for slink.
//!
//! - **PBKDF2-HMAC-SHA256** turns a short link key into a 256-bit key
//! - **AES-256-GCM** seals the content, so a wrong key or a flipped bit is
//!   detected instead of yielding garbage plaintext
//!
//! ## Threat Model
//!
//! We defend against:
//! - Reading stored records without the link key
//! - Tampering with stored ciphertext, salt or nonce
//!
//! We do NOT defend against:
//! - Brute force of a weak link key (only slowed down by the KDF)
//! - Key recovery, rotation or revocation

pub mod cipher;
pub mod key;
pub mod passphrase;

pub use cipher::{open, seal, ALGORITHM, NONCE_LEN, TAG_LEN};
pub use key::{derive_key, DerivedKey, KDF_ITERATIONS, SALT_LEN};
pub use passphrase::validate_passphrase;
