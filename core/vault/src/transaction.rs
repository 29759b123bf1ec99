//! In-place file transformation with rollback.
//!
//! A transaction reads the whole file, transforms it in memory, and only
//! then touches the filesystem. With [`CommitStrategy::SideRename`] the
//! original is first moved to a side file (`.raw` when encrypting, `.enc`
//! when decrypting); if writing the new content or removing the side file
//! fails, the side file is renamed back. A reader observing the path after
//! the call returns therefore sees either the original or the transformed
//! content, never a truncated file.
//!
//! This is exception-safe, not crash-safe: a process killed between the
//! first rename and the commit leaves the side file behind. [`FileTransaction::recover`]
//! puts it back.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::config::{CommitStrategy, SealConfig, ENC_SUFFIX, RAW_SUFFIX, TMP_SUFFIX};
use sealbox_common::{Error, Passphrase, Result};
use sealbox_crypto::Cryptor;
use sealbox_storage::FileSystem;

/// Which way a file is being transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// Suffix of the side file that holds the original content.
    pub fn side_suffix(self) -> &'static str {
        match self {
            Direction::Encrypt => RAW_SUFFIX,
            Direction::Decrypt => ENC_SUFFIX,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Progress of a side-rename transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Nothing on disk has changed.
    Original,
    /// The original lives at the side path; the target may be partial.
    Renamed,
    /// New content is in place and the side file is gone.
    Committed,
    /// The side file was moved back; equivalent to `Original`.
    RolledBack,
}

/// Append `.suffix` to the full file name: `notes.txt` -> `notes.txt.raw`.
pub fn side_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Encrypts and decrypts files in place.
pub struct FileTransaction<F> {
    fs: F,
    cryptor: Cryptor,
    strategy: CommitStrategy,
}

impl<F: FileSystem> FileTransaction<F> {
    /// Create a transaction runner with the default configuration.
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, &SealConfig::default())
    }

    /// Create a transaction runner with an explicit configuration.
    pub fn with_config(fs: F, config: &SealConfig) -> Self {
        Self {
            fs,
            cryptor: config.cryptor(),
            strategy: config.commit_strategy,
        }
    }

    /// Access the underlying file system.
    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    pub fn cryptor(&self) -> &Cryptor {
        &self.cryptor
    }

    pub fn strategy(&self) -> CommitStrategy {
        self.strategy
    }

    /// Replace a plaintext file's content with its encoded envelope.
    ///
    /// # Postconditions
    /// - On success the file holds Base64 text and no `.raw` sibling remains
    /// - On error the file holds its original content
    ///
    /// # Errors
    /// - `Error::Io` for filesystem failures (after rollback)
    /// - `Error::SideFileExists` if `path.raw` is already present
    /// - `Error::RollbackFailed` if the original could not be restored
    pub fn encrypt_file(&self, path: &Path, passphrase: &Passphrase) -> Result<()> {
        self.transform(path, passphrase, Direction::Encrypt)
    }

    /// Replace an encrypted file's content with the decrypted text.
    ///
    /// # Errors
    /// - `Error::Decryption` for a wrong passphrase or tampered file
    /// - `Error::MalformedEnvelope` if the file is not an encoded envelope
    /// - The I/O errors of [`FileTransaction::encrypt_file`], with `.enc`
    ///
    /// Cryptographic errors are raised before the file is touched.
    pub fn decrypt_file(&self, path: &Path, passphrase: &Passphrase) -> Result<()> {
        self.transform(path, passphrase, Direction::Decrypt)
    }

    /// Restore a file left behind by an interrupted transaction.
    ///
    /// Moves a `.raw` or `.enc` side file back over `path` and removes a
    /// stale `.tmp` file. Returns `true` if a side file was restored.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if both side files exist, since it is then
    ///   unclear which one holds the original
    pub fn recover(&self, path: &Path) -> Result<bool> {
        let raw = side_path(path, RAW_SUFFIX);
        let enc = side_path(path, ENC_SUFFIX);
        let tmp = side_path(path, TMP_SUFFIX);

        if self.fs.exists(&tmp) {
            info!(path = %tmp.display(), "Removing stale temp file");
            self.fs.delete(&tmp)?;
        }

        let side = match (self.fs.exists(&raw), self.fs.exists(&enc)) {
            (false, false) => return Ok(false),
            (true, false) => raw,
            (false, true) => enc,
            (true, true) => {
                return Err(Error::InvalidInput(format!(
                    "Both {} and {} exist; resolve manually",
                    raw.display(),
                    enc.display()
                )));
            }
        };

        self.fs.rename(&side, path)?;
        info!(path = %path.display(), side = %side.display(), "Recovered original content");
        Ok(true)
    }

    fn transform(&self, path: &Path, passphrase: &Passphrase, direction: Direction) -> Result<()> {
        debug!(path = %path.display(), %direction, "Starting file transaction");

        let content = Zeroizing::new(self.fs.read_to_string(path)?);
        let transformed = Zeroizing::new(match direction {
            Direction::Encrypt => self.cryptor.encrypt(&content, passphrase)?,
            Direction::Decrypt => self.cryptor.decrypt(&content, passphrase)?,
        });

        match self.strategy {
            CommitStrategy::SideRename => self.commit_side_rename(path, direction, &transformed)?,
            CommitStrategy::AtomicReplace => self.commit_atomic(path, &transformed)?,
        }

        info!(path = %path.display(), %direction, "File transaction committed");
        Ok(())
    }

    fn commit_side_rename(&self, path: &Path, direction: Direction, content: &str) -> Result<()> {
        let side = side_path(path, direction.side_suffix());
        if self.fs.exists(&side) {
            warn!(side = %side.display(), "Side file from an earlier transaction is present");
            return Err(Error::SideFileExists(side));
        }

        self.fs.rename(path, &side)?;
        trace_state(path, TransactionState::Renamed);

        let written = self
            .write_fresh(path, content)
            .and_then(|()| self.fs.delete(&side));

        match written {
            Ok(()) => {
                trace_state(path, TransactionState::Committed);
                Ok(())
            }
            Err(cause) => self.roll_back(path, &side, cause),
        }
    }

    fn commit_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let temp = side_path(path, TMP_SUFFIX);
        if self.fs.exists(&temp) {
            warn!(temp = %temp.display(), "Temp file from an earlier transaction is present");
            return Err(Error::SideFileExists(temp));
        }

        let written = self
            .write_fresh(&temp, content)
            .and_then(|()| self.fs.rename(&temp, path));

        if let Err(cause) = written {
            if !self.fs.exists(path) && self.fs.exists(&temp) {
                // The original is gone; the temp file is the only copy left.
                error!(
                    path = %path.display(),
                    temp = %temp.display(),
                    error = %cause,
                    "Atomic replace lost the original; transformed content remains in the temp file"
                );
                return Err(Error::RollbackFailed {
                    path: path.to_path_buf(),
                    side_path: temp,
                    cause: Box::new(cause),
                    rollback: Box::new(Error::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("{} no longer exists", path.display()),
                    ))),
                });
            }

            warn!(path = %path.display(), error = %cause, "Atomic replace failed, original untouched");
            if self.fs.exists(&temp) {
                if let Err(e) = self.fs.delete(&temp) {
                    warn!(temp = %temp.display(), error = %e, "Failed to remove temp file");
                }
            }
            return Err(cause);
        }

        trace_state(path, TransactionState::Committed);
        Ok(())
    }

    fn write_fresh(&self, path: &Path, content: &str) -> Result<()> {
        self.fs.create_empty(path)?;
        self.fs.append_text(path, content)
    }

    fn roll_back(&self, path: &Path, side: &Path, cause: Error) -> Result<()> {
        warn!(path = %path.display(), error = %cause, "File transaction failed, restoring original");

        match self.fs.rename(side, path) {
            Ok(()) => {
                trace_state(path, TransactionState::RolledBack);
                Err(cause)
            }
            Err(rollback) => {
                error!(
                    path = %path.display(),
                    side = %side.display(),
                    error = %rollback,
                    "Rollback failed; original content remains in the side file"
                );
                Err(Error::RollbackFailed {
                    path: path.to_path_buf(),
                    side_path: side.to_path_buf(),
                    cause: Box::new(cause),
                    rollback: Box::new(rollback),
                })
            }
        }
    }
}

fn trace_state(path: &Path, state: TransactionState) {
    debug!(path = %path.display(), ?state, "Transaction state changed");
}
