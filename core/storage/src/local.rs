//! Local filesystem implementation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

use crate::provider::FileSystem;
use sealbox_common::Result;

/// Local disk access through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

/// Whether a failed rename was refused only because the destination exists.
fn destination_blocks_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::AlreadyExists
}

fn with_path(err: io::Error, action: &str, path: &Path) -> io::Error {
    io::Error::new(
        err.kind(),
        format!("Failed to {} {}: {}", action, path.display(), err),
    )
}

impl FileSystem for LocalFileSystem {
    fn name(&self) -> &str {
        "local"
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).map_err(|e| with_path(e, "read", path))?)
    }

    /// Rename with fallback for platforms where rename fails if the
    /// destination exists.
    ///
    /// The source is never removed on failure. The destination is only
    /// removed when the platform reported it as already existing; any other
    /// error leaves both files in place.
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Err(initial_err) = fs::rename(from, to) {
            if !destination_blocks_rename(&initial_err) || !to.exists() || !from.exists() {
                return Err(with_path(initial_err, "rename", from).into());
            }

            warn!(
                from = %from.display(),
                to = %to.display(),
                "Rename over existing file failed, removing destination and retrying"
            );
            fs::remove_file(to).map_err(|e| with_path(e, "remove", to))?;
            fs::rename(from, to).map_err(|retry_err| {
                io::Error::new(
                    retry_err.kind(),
                    format!(
                        "Rename of {} failed (initial: {}, retry: {})",
                        from.display(),
                        initial_err,
                        retry_err
                    ),
                )
            })?;
        }
        Ok(())
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        File::create(path).map_err(|e| with_path(e, "create", path))?;
        Ok(())
    }

    fn append_text(&self, path: &Path, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| with_path(e, "open", path))?;
        file.write_all(text.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| with_path(e, "append to", path))?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| with_path(e, "delete", path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealbox_common::Error;
    use tempfile::tempdir;

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("to.txt");
        fs::write(&from, "test").unwrap();

        LocalFileSystem.rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "test");
    }

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("to.txt");
        fs::write(&to, "old").unwrap();
        fs::write(&from, "new").unwrap();

        LocalFileSystem.rename(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_only_already_exists_removes_destination() {
        let exists = io::Error::from(io::ErrorKind::AlreadyExists);
        assert!(destination_blocks_rename(&exists));

        for kind in [
            io::ErrorKind::PermissionDenied,
            io::ErrorKind::NotFound,
            io::ErrorKind::Other,
        ] {
            assert!(!destination_blocks_rename(&io::Error::from(kind)));
        }
    }

    #[test]
    fn test_failed_rename_keeps_destination() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("target");
        fs::write(&from, "new").unwrap();
        fs::create_dir(&to).unwrap();
        fs::write(to.join("keep.txt"), "old").unwrap();

        let result = LocalFileSystem.rename(&from, &to);

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(fs::read_to_string(&from).unwrap(), "new");
        assert_eq!(fs::read_to_string(to.join("keep.txt")).unwrap(), "old");
    }

    #[test]
    fn test_rename_missing_source_is_io_error() {
        let dir = tempdir().unwrap();
        let result = LocalFileSystem.rename(&dir.path().join("nope"), &dir.path().join("x"));

        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_append_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let fs_impl = LocalFileSystem::new();

        fs_impl.create_empty(&path).unwrap();
        assert_eq!(fs_impl.read_to_string(&path).unwrap(), "");

        fs_impl.append_text(&path, "hello ").unwrap();
        fs_impl.append_text(&path, "world").unwrap();
        assert_eq!(fs_impl.read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_create_empty_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "previous").unwrap();

        LocalFileSystem.create_empty(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "x").unwrap();

        assert!(LocalFileSystem.exists(&path));
        LocalFileSystem.delete(&path).unwrap();
        assert!(!LocalFileSystem.exists(&path));
        assert!(LocalFileSystem.delete(&path).is_err());
    }

    #[test]
    fn test_read_non_utf8_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        match LocalFileSystem.read_to_string(&path) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }
}
