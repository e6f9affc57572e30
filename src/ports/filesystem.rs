//! Host filesystem port: the entry handles an upload is read from.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Boxed future type alias used by the host ports to keep them dyn-compatible.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + Send + 'a>>;

/// Whether a host entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A readable leaf.
    File,
    /// A container whose children are listed through a [`DirectoryReader`].
    Directory,
}

/// A handle to one file or directory supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostEntry {
    /// Final path segment as reported by the host.
    pub name: String,
    /// File or directory.
    pub kind: EntryKind,
    /// Host-specific locator (an absolute path for the live adapter).
    pub location: String,
}

impl HostEntry {
    /// Creates a file entry.
    pub fn file(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::File, location: location.into() }
    }

    /// Creates a directory entry.
    pub fn directory(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Directory, location: location.into() }
    }

    /// Returns `true` for file entries.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` for directory entries.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Sequential reader over a directory's immediate children.
///
/// Hosts may hand back children in several batches. Completion is signalled
/// only by an empty batch, so callers keep reading until they get one.
pub trait DirectoryReader: Send {
    /// Reads the next batch of children.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory can no longer be enumerated.
    fn read_entries(&mut self) -> HostFuture<'_, Vec<HostEntry>>;
}

/// Provides access to the entries dropped on or selected in the host.
pub trait HostFileSystem: Send + Sync {
    /// Resolves a dropped or selected location into an entry handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the location does not exist or is neither a file
    /// nor a directory.
    fn entry(&self, location: &str) -> HostFuture<'_, HostEntry>;

    /// Reads a file entry's full payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>>;

    /// Opens a reader over a directory entry's children.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened.
    fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>>;
}
