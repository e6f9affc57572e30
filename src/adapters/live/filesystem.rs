//! Live host adapter using `tokio::fs`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::BatchedReader;
use crate::error::HostError;
use crate::ports::filesystem::{DirectoryReader, HostEntry, HostFileSystem, HostFuture};

/// Default number of children handed out per directory batch.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Live host adapter backed by real disk I/O.
///
/// Directory listings are sorted by name and paginated into batches of
/// `batch_size` children, ending with an empty batch.
///
/// Symlinks to files are followed. Symlinks to directories are never
/// listed, so a walk cannot loop back into its own ancestors. Special files
/// (FIFOs, sockets, devices) are left out as well. A child that cannot be
/// named or inspected, such as a non UTF-8 name or a dangling symlink,
/// fails the whole listing.
#[derive(Debug, Clone)]
pub struct LiveHostFileSystem {
    batch_size: usize,
}

impl LiveHostFileSystem {
    /// Creates a live host that lists directories in batches of `batch_size`.
    ///
    /// A batch size of zero is treated as one.
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size: batch_size.max(1) }
    }
}

impl Default for LiveHostFileSystem {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

fn path_to_location(path: &Path) -> Result<String, HostError> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| format!("path is not valid UTF-8: {}", path.display()).into())
}

/// Classifies `path`, following symlinks. Returns `None` for special files.
async fn classify(path: &Path, name: String) -> Result<Option<HostEntry>, HostError> {
    let metadata = tokio::fs::metadata(path).await?;
    let location = path_to_location(path)?;
    if metadata.is_dir() {
        Ok(Some(HostEntry::directory(name, location)))
    } else if metadata.is_file() {
        Ok(Some(HostEntry::file(name, location)))
    } else {
        Ok(None)
    }
}

async fn resolve(path: PathBuf) -> Result<HostEntry, HostError> {
    let canonical = tokio::fs::canonicalize(&path).await?;
    let name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| format!("{} has no usable name", canonical.display()))?;
    match classify(&canonical, name).await? {
        Some(entry) => Ok(entry),
        None => Err(format!("{} is neither a file nor a directory", path.display()).into()),
    }
}

async fn read_bytes(path: PathBuf) -> Result<Vec<u8>, HostError> {
    Ok(tokio::fs::read(&path).await?)
}

/// Classifies a directory child without following directory symlinks.
///
/// Returns `None` for children that are deliberately left out.
async fn classify_child(path: &Path, name: String) -> Result<Option<HostEntry>, HostError> {
    let link = tokio::fs::symlink_metadata(path).await?;
    if !link.file_type().is_symlink() {
        return classify(path, name).await;
    }
    let target = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("cannot follow symlink {}: {e}", path.display()))?;
    if target.is_dir() {
        return Ok(None);
    }
    classify(path, name).await
}

async fn list_children(path: PathBuf) -> Result<Vec<HostEntry>, HostError> {
    let mut children = Vec::new();
    let mut dir = tokio::fs::read_dir(&path).await?;
    while let Some(child) = dir.next_entry().await? {
        let child_path = child.path();
        let name = child
            .file_name()
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| format!("entry name is not valid UTF-8: {}", child_path.display()))?;
        match classify_child(&child_path, name).await? {
            Some(entry) => children.push(entry),
            None => debug!(path = %child_path.display(), "leaving out directory symlink or special file"),
        }
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

impl HostFileSystem for LiveHostFileSystem {
    fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
        Box::pin(resolve(PathBuf::from(location)))
    }

    fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
        Box::pin(read_bytes(PathBuf::from(&entry.location)))
    }

    fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
        let path = PathBuf::from(&entry.location);
        let batch_size = self.batch_size;
        Box::pin(async move {
            let children = list_children(path).await?;
            let reader: Box<dyn DirectoryReader> = Box::new(BatchedReader::new(children, batch_size));
            Ok::<_, HostError>(reader)
        })
    }
}
