//! Transaction configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use sealbox_common::{Error, Result};
use sealbox_crypto::{Cryptor, NonceMode};

/// Side-file suffix holding the plaintext while a file is encrypted.
pub const RAW_SUFFIX: &str = "raw";

/// Side-file suffix holding the ciphertext while a file is decrypted.
pub const ENC_SUFFIX: &str = "enc";

/// Temp-file suffix used by [`CommitStrategy::AtomicReplace`].
pub const TMP_SUFFIX: &str = "tmp";

/// How transformed content replaces the original file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStrategy {
    /// Move the original aside, write the new content in its place, then
    /// delete the side file. Failures move the side file back.
    #[default]
    SideRename,
    /// Write the new content to a temp sibling and rename it over the
    /// original. The original is never moved.
    AtomicReplace,
}

/// Configuration for file transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealConfig {
    /// How the envelope IV reaches GCM.
    pub nonce_mode: NonceMode,
    /// How a transformed file is committed.
    pub commit_strategy: CommitStrategy,
}

impl SealConfig {
    /// Build the encryption engine this configuration selects.
    pub fn cryptor(&self) -> Cryptor {
        Cryptor::new(self.nonce_mode)
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidInput(format!("Invalid configuration: {}", e)))
    }

    /// Deserialize configuration from JSON.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("Invalid configuration: {}", e)))
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SealConfig::default();
        assert_eq!(config.nonce_mode, NonceMode::Truncated);
        assert_eq!(config.commit_strategy, CommitStrategy::SideRename);
        assert_eq!(config.cryptor().nonce_mode(), NonceMode::Truncated);
    }

    #[test]
    fn test_config_serialization() {
        let config = SealConfig {
            nonce_mode: NonceMode::FullIv,
            commit_strategy: CommitStrategy::AtomicReplace,
        };

        let json = config.to_json().unwrap();
        assert!(json.contains("\"full_iv\""));
        assert!(json.contains("\"atomic_replace\""));

        let restored = SealConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SealConfig::from_json(r#"{"nonce_mode": "full_iv"}"#).unwrap();
        assert_eq!(config.nonce_mode, NonceMode::FullIv);
        assert_eq!(config.commit_strategy, CommitStrategy::SideRename);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = SealConfig::from_json(r#"{"nonce_mode": "hashed"}"#);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
