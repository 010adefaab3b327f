//! Envelope data type and its canonical single-line JSON encoding.
//!
//! Wire shape (field order is fixed):
//!
//! ```text
//! {"v":1,"algo":"AES-GCM","salt":"<base64>","iv":"<base64>","c":"<base64>"}
//! ```
//!
//! Decoding checks format only. An unknown `algo` or `v` decodes fine and is
//! rejected later by [`crate::crypto::open`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, SlinkError};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

/// The result of sealing one payload: everything needed to open it again
/// except the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: u32,
    pub algorithm: String,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeRecord {
    v: u32,
    algo: String,
    salt: String,
    iv: String,
    c: String,
}

impl Envelope {
    /// Encode as a single-line JSON object.
    ///
    /// Standard base64 never emits line breaks, and serde_json's compact
    /// writer escapes any newline inside strings, so the output is always one
    /// line.
    pub fn encode(&self) -> Result<String> {
        let record = EnvelopeRecord {
            v: self.version,
            algo: self.algorithm.clone(),
            salt: STANDARD.encode(self.salt),
            iv: STANDARD.encode(self.nonce),
            c: STANDARD.encode(&self.ciphertext),
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Decode an envelope from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SlinkError::MalformedEnvelope` if the text is not JSON, a key
    /// is missing, a byte field is not base64, or a byte field has the wrong
    /// length (truncated salt/nonce, ciphertext shorter than the tag).
    pub fn decode(text: &str) -> Result<Self> {
        let record: EnvelopeRecord = serde_json::from_str(text.trim())?;

        let salt = decode_fixed::<SALT_LEN>("salt", &record.salt)?;
        let nonce = decode_fixed::<NONCE_LEN>("iv", &record.iv)?;
        let ciphertext = decode_field("c", &record.c)?;
        if ciphertext.len() < TAG_LEN {
            return Err(SlinkError::MalformedEnvelope(format!(
                "c is shorter than the {}-byte tag",
                TAG_LEN
            )));
        }

        Ok(Self {
            version: record.v,
            algorithm: record.algo,
            salt,
            nonce,
            ciphertext,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| SlinkError::MalformedEnvelope(format!("{} is not valid base64: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        SlinkError::MalformedEnvelope(format!(
            "{} must be {} bytes (got {})",
            name,
            N,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            version: 1,
            algorithm: "AES-GCM".to_string(),
            salt: [0x11; SALT_LEN],
            nonce: [0x22; NONCE_LEN],
            ciphertext: vec![0x33; 21],
        }
    }

    #[test]
    fn test_encode_is_canonical_single_line() {
        let text = sample().encode().unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with(r#"{"v":1,"algo":"AES-GCM","salt":""#));
        assert_eq!(
            text,
            format!(
                r#"{{"v":1,"algo":"AES-GCM","salt":"{}","iv":"{}","c":"{}"}}"#,
                STANDARD.encode([0x11; SALT_LEN]),
                STANDARD.encode([0x22; NONCE_LEN]),
                STANDARD.encode([0x33; 21]),
            )
        );
    }

    #[test]
    fn test_decode_inverts_encode() {
        let envelope = sample();
        let decoded = Envelope::decode(&envelope.encode().unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_decode_rejects_missing_keys() {
        let full = serde_json::to_value(EnvelopeRecord {
            v: 1,
            algo: "AES-GCM".to_string(),
            salt: STANDARD.encode([0u8; SALT_LEN]),
            iv: STANDARD.encode([0u8; NONCE_LEN]),
            c: STANDARD.encode([0u8; TAG_LEN]),
        })
        .unwrap();

        for key in ["v", "algo", "salt", "iv", "c"] {
            let mut value = full.clone();
            value.as_object_mut().unwrap().remove(key);
            let result = Envelope::decode(&value.to_string());
            assert!(
                matches!(result, Err(SlinkError::MalformedEnvelope(_))),
                "missing {} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(matches!(
            Envelope::decode("https://example.com"),
            Err(SlinkError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            Envelope::decode(r#"{"v":1,"algo":"AES-GCM""#),
            Err(SlinkError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let text = r#"{"v":1,"algo":"AES-GCM","salt":"!!!!","iv":"AAAAAAAAAAAAAAAA","c":"AAAAAAAAAAAAAAAAAAAAAA=="}"#;
        let err = Envelope::decode(text).unwrap_err();
        assert!(err.to_string().contains("salt is not valid base64"));
    }

    #[test]
    fn test_decode_rejects_truncated_fields() {
        let mut envelope = sample().encode().unwrap();
        // 8-byte salt instead of 16
        envelope = envelope.replace(
            &STANDARD.encode([0x11; SALT_LEN]),
            &STANDARD.encode([0x11; 8]),
        );
        let err = Envelope::decode(&envelope).unwrap_err();
        assert!(err.to_string().contains("salt must be 16 bytes"));

        let short_tag = format!(
            r#"{{"v":1,"algo":"AES-GCM","salt":"{}","iv":"{}","c":"{}"}}"#,
            STANDARD.encode([0u8; SALT_LEN]),
            STANDARD.encode([0u8; NONCE_LEN]),
            STANDARD.encode([0u8; 4]),
        );
        assert!(matches!(
            Envelope::decode(&short_tag),
            Err(SlinkError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_decode_accepts_unknown_algorithm() {
        let text = sample()
            .encode()
            .unwrap()
            .replace("AES-GCM", "XCHACHA20-POLY1305");
        let decoded = Envelope::decode(&text).unwrap();
        assert_eq!(decoded.algorithm, "XCHACHA20-POLY1305");
    }

    #[test]
    fn test_decode_ignores_unknown_keys_and_whitespace() {
        let text = format!(
            "  {{\"v\":1,\"algo\":\"AES-GCM\",\"salt\":\"{}\",\"iv\":\"{}\",\"c\":\"{}\",\"extra\":true}}\r",
            STANDARD.encode([0x11; SALT_LEN]),
            STANDARD.encode([0x22; NONCE_LEN]),
            STANDARD.encode([0x33; 21]),
        );
        assert_eq!(Envelope::decode(&text).unwrap(), sample());
    }
}
