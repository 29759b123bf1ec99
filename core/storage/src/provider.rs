//! File system trait definition.

use std::fmt;
use std::path::Path;

use sealbox_common::Result;

/// Primitive operations a [`FileSystem`] offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    Read,
    Rename,
    CreateEmpty,
    Append,
    Delete,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FsOp::Read => "read",
            FsOp::Rename => "rename",
            FsOp::CreateEmpty => "create",
            FsOp::Append => "append",
            FsOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// File primitives consumed by the transaction layer.
///
/// Implementations must report every failure as `Error::Io` so callers can
/// tell a filesystem problem apart from a cryptographic one.
pub trait FileSystem: Send + Sync {
    /// Get the implementation name (e.g., "local", "memory").
    fn name(&self) -> &str;

    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    /// - File not found
    /// - Content is not valid UTF-8
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Move `from` to `to`, replacing `to` if it exists.
    ///
    /// # Postconditions
    /// - On error, `from` is still present
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create an empty file, truncating any existing one.
    fn create_empty(&self, path: &Path) -> Result<()>;

    /// Append text to the end of a file, creating it if missing.
    fn append_text(&self, path: &Path, text: &str) -> Result<()>;

    /// Delete a single file.
    ///
    /// # Errors
    /// - File not found
    fn delete(&self, path: &Path) -> Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_op_display() {
        assert_eq!(FsOp::Rename.to_string(), "rename");
        assert_eq!(FsOp::CreateEmpty.to_string(), "create");
    }
}
