//! Read-only access to a namespace registry directory
//!
//! A registry is a directory whose entries are namespace files (bind
//! mounts of `/proc/<pid>/ns/*`) named after the namespace. It is owned
//! and populated by an administrator; nsdo never writes to it.

use nsdo_core::NamespaceId;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of a complete, error-free registry scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Entry referring to the namespace
    Found(PathBuf),
    /// No entry refers to the namespace
    Absent,
}

/// Failed scan step
#[derive(Debug)]
pub struct ScanError {
    /// System call that failed
    pub operation: &'static str,
    /// Path it failed on
    pub path: PathBuf,
    /// Underlying cause
    pub source: io::Error,
}

/// Namespace registry directory
#[derive(Debug, Clone)]
pub struct Registry {
    dir: PathBuf,
}

impl Registry {
    /// Wrap a registry directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Registry directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Identity of the namespace file at `path`, following symlinks
    ///
    /// # Errors
    /// Returns the `stat` failure
    pub fn identity(path: &Path) -> Result<NamespaceId, ScanError> {
        fs::metadata(path)
            .map(|meta| NamespaceId::from(&meta))
            .map_err(|source| ScanError {
                operation: "stat",
                path: path.to_path_buf(),
                source,
            })
    }

    /// Look for an entry referring to the namespace `id`.
    ///
    /// Every failure aborts the scan: an unreadable directory or an entry
    /// that cannot be inspected is never reported as [`Presence::Absent`].
    ///
    /// # Errors
    /// Returns the first `opendir`, `readdir` or `stat` failure
    pub fn find(&self, id: NamespaceId) -> Result<Presence, ScanError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| ScanError {
            operation: "opendir",
            path: self.dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScanError {
                operation: "readdir",
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            let entry_id = Self::identity(&path)?;

            debug!(entry = %path.display(), id = %entry_id, "Inspected registry entry");

            if entry_id == id {
                return Ok(Presence::Found(path));
            }
        }

        Ok(Presence::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_find_matching_entry() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("blue");
        fs::write(&target, b"").unwrap();
        fs::write(dir.path().join("green"), b"").unwrap();

        let id = Registry::identity(&target).unwrap();
        let found = Registry::new(dir.path()).find(id).unwrap();

        assert_eq!(found, Presence::Found(target));
    }

    #[test]
    fn test_find_follows_symlinks() {
        let outside = tempfile::NamedTempFile::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        symlink(outside.path(), dir.path().join("linked")).unwrap();

        let id = Registry::identity(outside.path()).unwrap();
        let found = Registry::new(dir.path()).find(id).unwrap();

        assert_eq!(found, Presence::Found(dir.path().join("linked")));
    }

    #[test]
    fn test_find_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("green"), b"").unwrap();
        let outside = tempfile::NamedTempFile::new().unwrap();

        let id = Registry::identity(outside.path()).unwrap();

        assert_eq!(Registry::new(dir.path()).find(id).unwrap(), Presence::Absent);
    }

    #[test]
    fn test_empty_registry_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let id = NamespaceId::from_raw(0, 0);

        assert_eq!(Registry::new(dir.path()).find(id).unwrap(), Presence::Absent);
    }

    #[test]
    fn test_missing_registry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(dir.path().join("does-not-exist"));

        let err = registry.find(NamespaceId::from_raw(0, 0)).unwrap_err();

        assert_eq!(err.operation, "opendir");
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_dangling_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        symlink(dir.path().join("gone"), dir.path().join("stale")).unwrap();

        let err = Registry::new(dir.path())
            .find(NamespaceId::from_raw(0, 0))
            .unwrap_err();

        assert_eq!(err.operation, "stat");
        assert_eq!(err.path, dir.path().join("stale"));
    }
}
