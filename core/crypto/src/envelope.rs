//! The self-describing envelope: `IV (24B) ‖ Salt (16B) ‖ Ciphertext‖Tag`.
//!
//! IV and salt are fixed-size, so no length prefixes are needed; everything
//! after the first [`HEADER_SIZE`] bytes is the sealed payload. The text
//! form is standard, padded Base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

use crate::keys::{Iv, Salt, IV_LENGTH, SALT_LENGTH};
use sealbox_common::{Error, Result};

/// Size of the fixed IV + salt prefix.
pub const HEADER_SIZE: usize = IV_LENGTH + SALT_LENGTH;

/// A decoded envelope.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: Iv,
    salt: Salt,
    sealed: Vec<u8>,
}

impl Envelope {
    /// Frame an IV, salt and sealed payload.
    pub fn new(iv: Iv, salt: Salt, sealed: Vec<u8>) -> Self {
        Self { iv, salt, sealed }
    }

    pub fn iv(&self) -> &Iv {
        &self.iv
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Ciphertext with the GCM tag appended.
    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }

    /// Serialize to `IV ‖ Salt ‖ Sealed`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.sealed.len());
        bytes.extend_from_slice(self.iv.as_bytes());
        bytes.extend_from_slice(self.salt.as_bytes());
        bytes.extend_from_slice(&self.sealed);
        bytes
    }

    /// Split raw envelope bytes.
    ///
    /// # Errors
    /// - `Error::MalformedEnvelope` if fewer than HEADER_SIZE bytes are given
    ///
    /// An input of exactly HEADER_SIZE bytes decodes to an empty sealed
    /// payload; rejecting it is left to the cipher.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::MalformedEnvelope(format!(
                "expected at least {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let (iv_bytes, rest) = bytes.split_at(IV_LENGTH);
        let (salt_bytes, sealed) = rest.split_at(SALT_LENGTH);

        let mut iv = [0u8; IV_LENGTH];
        iv.copy_from_slice(iv_bytes);
        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(salt_bytes);

        Ok(Self {
            iv: Iv::from_bytes(iv),
            salt: Salt::from_bytes(salt),
            sealed: sealed.to_vec(),
        })
    }

    /// Encode as standard padded Base64.
    pub fn to_text(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode from Base64 text.
    ///
    /// Surrounding whitespace, such as a trailing newline added by an
    /// editor, is ignored.
    ///
    /// # Errors
    /// - `Error::MalformedEnvelope` on invalid Base64 or a short envelope
    pub fn from_text(text: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| Error::MalformedEnvelope(format!("invalid Base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("iv", &self.iv)
            .field("salt", &self.salt)
            .field("sealed_len", &self.sealed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope::new(
            Iv::from_bytes([1u8; IV_LENGTH]),
            Salt::from_bytes([2u8; SALT_LENGTH]),
            vec![3u8; 20],
        )
    }

    #[test]
    fn test_layout_order() {
        let bytes = sample().to_bytes();

        assert_eq!(bytes.len(), HEADER_SIZE + 20);
        assert!(bytes[..IV_LENGTH].iter().all(|b| *b == 1));
        assert!(bytes[IV_LENGTH..HEADER_SIZE].iter().all(|b| *b == 2));
        assert!(bytes[HEADER_SIZE..].iter().all(|b| *b == 3));
    }

    #[test]
    fn test_from_bytes_splits_fields() {
        let envelope = Envelope::from_bytes(&sample().to_bytes()).unwrap();
        assert_eq!(envelope, sample());
    }

    #[test]
    fn test_short_input_rejected() {
        for len in [0, 1, IV_LENGTH, HEADER_SIZE - 1] {
            let result = Envelope::from_bytes(&vec![0u8; len]);
            assert!(
                matches!(result, Err(Error::MalformedEnvelope(_))),
                "length {} should be rejected",
                len
            );
        }
    }

    #[test]
    fn test_header_only_has_empty_payload() {
        let envelope = Envelope::from_bytes(&[9u8; HEADER_SIZE]).unwrap();
        assert!(envelope.sealed().is_empty());
    }

    #[test]
    fn test_text_is_standard_padded_base64() {
        let text = sample().to_text();
        // 60 bytes encode to exactly 80 characters; 59 need one pad.
        assert_eq!(text.len(), 80);

        let padded = Envelope::new(*sample().iv(), *sample().salt(), vec![3u8; 19]).to_text();
        assert!(padded.ends_with('='));
    }

    #[test]
    fn test_from_text_ignores_surrounding_whitespace() {
        let text = format!("{}\n", sample().to_text());
        assert_eq!(Envelope::from_text(&text).unwrap(), sample());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let result = Envelope::from_text("not base64 at all!");
        assert!(matches!(result, Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_valid_base64_but_short_rejected() {
        let result = Envelope::from_text(&STANDARD.encode([0u8; 10]));
        assert!(matches!(result, Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_debug_omits_payload() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("sealed_len: 20"));
    }
}
