//! Common error types for SealBox.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for SealBox operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The key derivation primitive rejected its parameters.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Input is not a well-formed encoded envelope.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authentication failed: wrong passphrase or corrupted ciphertext.
    ///
    /// The two causes are deliberately indistinguishable.
    #[error("Decryption failed: wrong passphrase or corrupted data")]
    Decryption,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A side file from an earlier, interrupted transaction is in the way.
    #[error("Side file already exists: {}", .0.display())]
    SideFileExists(PathBuf),

    /// A transaction failed and restoring the original also failed.
    ///
    /// The only surviving copy is at `side_path` and must be moved to `path`
    /// by hand. After a side-rename commit it holds the original content;
    /// after an atomic replace it holds the transformed content.
    #[error(
        "Rollback failed for {}: content left at {} (cause: {cause}; rollback: {rollback})",
        .path.display(),
        .side_path.display()
    )]
    RollbackFailed {
        path: PathBuf,
        side_path: PathBuf,
        cause: Box<Error>,
        rollback: Box<Error>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether the error means the data could not be authenticated.
    pub fn is_decryption(&self) -> bool {
        matches!(self, Error::Decryption)
    }

    /// Whether the error leaves data that needs manual recovery.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RollbackFailed { .. } | Error::KeyDerivation(_))
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_failed_names_both_paths() {
        let err = Error::RollbackFailed {
            path: PathBuf::from("/data/secret.txt"),
            side_path: PathBuf::from("/data/secret.txt.raw"),
            cause: Box::new(Error::Io(std::io::Error::other("disk full"))),
            rollback: Box::new(Error::Io(std::io::Error::other("read-only"))),
        };

        let msg = err.to_string();
        assert!(msg.contains("/data/secret.txt"));
        assert!(msg.contains("/data/secret.txt.raw"));
        assert!(msg.contains("disk full"));
        assert!(msg.contains("read-only"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_decryption_message_is_generic() {
        let err = Error::Decryption;
        assert!(err.is_decryption());
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("wrong passphrase or corrupted data"));
    }

    #[test]
    fn test_io_from() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
