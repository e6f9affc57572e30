//! In-memory host adapter.

use std::collections::{HashMap, HashSet};

use futures::future::ready;

use crate::adapters::BatchedReader;
use crate::error::HostError;
use crate::ports::{DirectoryReader, EntryKind, HostEntry, HostFileSystem, HostFuture};

/// A host whose entries live in memory, addressed by slash-separated paths.
///
/// Directory children are listed in the order they were first added.
/// Reads and listings can be made to fail for specific paths.
#[derive(Debug, Clone)]
pub struct MemoryHostFileSystem {
    files: HashMap<String, Vec<u8>>,
    dirs: HashMap<String, Vec<HostEntry>>,
    failing_reads: HashSet<String>,
    failing_listings: HashSet<String>,
    batch_size: usize,
}

impl Default for MemoryHostFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHostFileSystem {
    /// Creates an empty host listing one hundred children per batch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            dirs: HashMap::new(),
            failing_reads: HashSet::new(),
            failing_listings: HashSet::new(),
            batch_size: 100,
        }
    }

    /// Builds a host from `(path, content)` pairs.
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        files.into_iter().fold(Self::new(), |host, (path, content)| host.with_file(path, content))
    }

    /// Adds a text file, creating its parent directories.
    #[must_use]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_bytes(path, content.as_bytes().to_vec())
    }

    /// Adds a file with raw content, creating its parent directories.
    #[must_use]
    pub fn with_bytes(mut self, path: &str, content: Vec<u8>) -> Self {
        if self.files.insert(path.to_string(), content).is_none() {
            self.link(path, EntryKind::File);
        }
        self
    }

    /// Adds an empty directory and its parents.
    #[must_use]
    pub fn with_dir(mut self, path: &str) -> Self {
        self.ensure_dir(path);
        self
    }

    /// Sets how many children each listing batch holds.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Makes reading the file at `path` fail.
    #[must_use]
    pub fn failing_read(mut self, path: &str) -> Self {
        self.failing_reads.insert(path.to_string());
        self
    }

    /// Makes opening the directory at `path` fail.
    #[must_use]
    pub fn failing_listing(mut self, path: &str) -> Self {
        self.failing_listings.insert(path.to_string());
        self
    }

    fn ensure_dir(&mut self, path: &str) {
        if !self.dirs.contains_key(path) {
            self.dirs.insert(path.to_string(), Vec::new());
            self.link(path, EntryKind::Directory);
        }
    }

    /// Registers `path` as a child of its parent directory.
    fn link(&mut self, path: &str, kind: EntryKind) {
        let Some((parent, name)) = path.rsplit_once('/') else {
            return;
        };
        self.ensure_dir(parent);
        let entry = HostEntry { name: name.to_string(), kind, location: path.to_string() };
        if let Some(children) = self.dirs.get_mut(parent) {
            if !children.iter().any(|c| c.name == entry.name) {
                children.push(entry);
            }
        }
    }

    fn lookup(&self, location: &str) -> Result<HostEntry, HostError> {
        let name = location.rsplit('/').next().unwrap_or(location).to_string();
        if self.files.contains_key(location) {
            Ok(HostEntry::file(name, location))
        } else if self.dirs.contains_key(location) {
            Ok(HostEntry::directory(name, location))
        } else {
            Err(format!("no such entry: {location}").into())
        }
    }

    fn contents(&self, location: &str) -> Result<Vec<u8>, HostError> {
        if self.failing_reads.contains(location) {
            return Err(format!("cannot read {location}").into());
        }
        self.files.get(location).cloned().ok_or_else(|| format!("not a file: {location}").into())
    }

    fn reader(&self, location: &str) -> Result<Box<dyn DirectoryReader>, HostError> {
        if self.failing_listings.contains(location) {
            return Err(format!("cannot list {location}").into());
        }
        let children =
            self.dirs.get(location).cloned().ok_or_else(|| format!("not a directory: {location}"))?;
        Ok(Box::new(BatchedReader::new(children, self.batch_size)))
    }
}

impl HostFileSystem for MemoryHostFileSystem {
    fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
        Box::pin(ready(self.lookup(location)))
    }

    fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
        Box::pin(ready(self.contents(&entry.location)))
    }

    fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
        Box::pin(ready(self.reader(&entry.location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_children_in_insertion_order() {
        let host = MemoryHostFileSystem::from_files([("p/b.rs", "b"), ("p/a.rs", "a"), ("p/d/c.rs", "c")])
            .with_batch_size(2);

        let root = host.entry("p").await.unwrap();
        assert!(root.is_directory());

        let mut reader = host.open_directory(&root).await.unwrap();
        let first = reader.read_entries().await.unwrap();
        let second = reader.read_entries().await.unwrap();
        assert!(reader.read_entries().await.unwrap().is_empty());

        let names: Vec<_> = first.iter().chain(&second).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.rs", "a.rs", "d"]);
        assert_eq!(second[0].kind, EntryKind::Directory);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let host = MemoryHostFileSystem::new()
            .with_file("p/a.rs", "a")
            .failing_read("p/a.rs")
            .failing_listing("p");

        let file = host.entry("p/a.rs").await.unwrap();
        assert!(host.read_file(&file).await.is_err());
        let dir = host.entry("p").await.unwrap();
        assert!(host.open_directory(&dir).await.is_err());
        assert!(host.entry("q").await.is_err());
    }
}
