//! Filesystem existence checks.

use std::io;
use std::path::Path;

/// What, if anything, sits at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Folder,
}

/// Inspect `path`. Only a not-found error means [`EntryKind::Missing`];
/// any other metadata error is returned.
pub fn entry_kind(path: impl AsRef<Path>) -> io::Result<EntryKind> {
    match path.as_ref().metadata() {
        Ok(meta) if meta.is_dir() => Ok(EntryKind::Folder),
        Ok(_) => Ok(EntryKind::File),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
        Err(e) => Err(e),
    }
}

/// True if `path` exists and is not a directory.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    matches!(entry_kind(path), Ok(EntryKind::File))
}

/// True if `path` exists and is a directory.
pub fn folder_exists(path: impl AsRef<Path>) -> bool {
    matches!(entry_kind(path), Ok(EntryKind::Folder))
}
