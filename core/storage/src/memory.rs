//! In-memory file system for testing.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::provider::FileSystem;
use sealbox_common::Result;

/// In-memory file system.
///
/// Useful for testing and development. Files are plain strings keyed by
/// path; there are no directories. All data is lost on drop. Clones share
/// the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with content.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into());
    }

    /// Get a copy of a file's content.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("File not found: {}", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn name(&self) -> &str {
        "memory"
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(self.get(path).ok_or_else(|| not_found(path))?)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        let content = files.remove(from).ok_or_else(|| not_found(from))?;
        files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        self.insert(path, String::new());
        Ok(())
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_default()
            .push_str(text);
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .ok_or_else(|| not_found(path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealbox_common::Error;

    #[test]
    fn test_append_and_read() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/notes.txt");

        fs.create_empty(path).unwrap();
        fs.append_text(path, "hello ").unwrap();
        fs.append_text(path, "world").unwrap();

        assert_eq!(fs.read_to_string(path).unwrap(), "hello world");
    }

    #[test]
    fn test_rename_replaces_destination() {
        let fs = MemoryFileSystem::new();
        fs.insert("/a", "new");
        fs.insert("/b", "old");

        fs.rename(Path::new("/a"), Path::new("/b")).unwrap();

        assert!(!fs.exists(Path::new("/a")));
        assert_eq!(fs.get(Path::new("/b")).as_deref(), Some("new"));
    }

    #[test]
    fn test_missing_file_errors() {
        let fs = MemoryFileSystem::new();
        let missing = Path::new("/missing");

        assert!(matches!(fs.read_to_string(missing), Err(Error::Io(_))));
        assert!(matches!(fs.delete(missing), Err(Error::Io(_))));
        assert!(matches!(
            fs.rename(missing, Path::new("/x")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_clones_share_storage() {
        let fs = MemoryFileSystem::new();
        let clone = fs.clone();
        clone.insert("/shared", "data");

        assert_eq!(fs.paths(), vec![PathBuf::from("/shared")]);
    }
}
