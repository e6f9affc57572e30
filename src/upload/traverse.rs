//! Depth-first walk over host entries producing flat file records.

use std::future::Future;
use std::pin::Pin;

use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::{Decoding, Fanout};
use crate::error::{HostError, UploadError};
use crate::ports::{HostEntry, HostFileSystem, IdGenerator};
use crate::tree::FileRecord;
use crate::upload::language::detect_language;

type VisitFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<FileRecord>, UploadError>> + Send + 'a>>;

/// Walks host entries into [`FileRecord`]s.
///
/// Every host call is a suspension point that also observes the
/// cancellation token. Any read or listing failure aborts the whole walk.
pub struct Traversal<'a> {
    host: &'a dyn HostFileSystem,
    ids: &'a dyn IdGenerator,
    fanout: Fanout,
    decoding: Decoding,
    cancel: CancellationToken,
}

impl<'a> Traversal<'a> {
    /// Creates a sequential, strictly decoding traversal that is never cancelled.
    pub fn new(host: &'a dyn HostFileSystem, ids: &'a dyn IdGenerator) -> Self {
        Self {
            host,
            ids,
            fanout: Fanout::default(),
            decoding: Decoding::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Sets the sibling fan-out strategy.
    #[must_use]
    pub fn fanout(mut self, fanout: Fanout) -> Self {
        self.fanout = fanout;
        self
    }

    /// Sets the byte decoding policy.
    #[must_use]
    pub fn decoding(mut self, decoding: Decoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Sets the token that aborts the walk when cancelled.
    #[must_use]
    pub fn cancel_on(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolves host locations into root entries.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Resolve`] for the first location the host
    /// cannot resolve, or [`UploadError::Cancelled`].
    pub async fn resolve(&self, locations: &[String]) -> Result<Vec<HostEntry>, UploadError> {
        let mut roots = Vec::with_capacity(locations.len());
        for location in locations {
            let entry = self
                .suspend(self.host.entry(location))
                .await?
                .map_err(|source| UploadError::Resolve { location: location.clone(), source })?;
            roots.push(entry);
        }
        Ok(roots)
    }

    /// Walks `roots` and returns their files, depth-first in host order.
    ///
    /// The output order is the same for both fan-out strategies.
    ///
    /// # Errors
    ///
    /// Returns the first [`UploadError::ReadFailure`],
    /// [`UploadError::ListingFailure`] or [`UploadError::Cancelled`]
    /// encountered; no records are returned in that case.
    pub async fn run(&self, roots: &[HostEntry]) -> Result<Vec<FileRecord>, UploadError> {
        let subtrees = roots.iter().map(|root| self.visit(root.clone(), String::new()));
        let records = self.join(subtrees.collect()).await?;
        debug!(files = records.len(), "traversal finished");
        Ok(records)
    }

    fn visit(&self, entry: HostEntry, prefix: String) -> VisitFuture<'_> {
        Box::pin(async move {
            let path = join_path(&prefix, &entry.name);
            if entry.is_file() {
                Ok(vec![self.read(&entry, path).await?])
            } else {
                let children = self.list(&entry, &path).await?;
                let subtrees = children.into_iter().map(|child| self.visit(child, path.clone()));
                self.join(subtrees.collect()).await
            }
        })
    }

    /// Awaits subtrees per the fan-out strategy and concatenates them in order.
    async fn join(&self, subtrees: Vec<VisitFuture<'_>>) -> Result<Vec<FileRecord>, UploadError> {
        let parts = match self.fanout {
            Fanout::Sequential => {
                let mut parts = Vec::with_capacity(subtrees.len());
                for subtree in subtrees {
                    parts.push(subtree.await?);
                }
                parts
            }
            Fanout::Concurrent => try_join_all(subtrees).await?,
        };
        Ok(parts.into_iter().flatten().collect())
    }

    async fn read(&self, entry: &HostEntry, path: String) -> Result<FileRecord, UploadError> {
        let bytes = match self.suspend(self.host.read_file(entry)).await? {
            Ok(bytes) => bytes,
            Err(source) => return Err(UploadError::ReadFailure { path, source }),
        };
        let content = match self.decode(bytes) {
            Ok(content) => content,
            Err(source) => return Err(UploadError::ReadFailure { path, source }),
        };
        trace!(%path, bytes = content.len(), "read file");

        Ok(FileRecord {
            id: self.ids.generate_id(),
            name: entry.name.clone(),
            language: detect_language(&entry.name).to_string(),
            path,
            content,
        })
    }

    /// Drains a directory reader until it hands back an empty batch.
    async fn list(&self, entry: &HostEntry, path: &str) -> Result<Vec<HostEntry>, UploadError> {
        let listing_failure =
            |source: HostError| UploadError::ListingFailure { path: path.to_string(), source };

        let mut reader =
            self.suspend(self.host.open_directory(entry)).await?.map_err(listing_failure)?;
        let mut children = Vec::new();
        loop {
            let batch = self.suspend(reader.read_entries()).await?.map_err(listing_failure)?;
            if batch.is_empty() {
                break;
            }
            trace!(%path, batch = batch.len(), "listed batch");
            children.extend(batch);
        }
        debug!(%path, children = children.len(), "listed directory");
        Ok(children)
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String, HostError> {
        match self.decoding {
            Decoding::Strict => Ok(String::from_utf8(bytes)?),
            Decoding::Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }

    /// Awaits `fut` unless the upload is cancelled first.
    async fn suspend<F: Future>(&self, fut: F) -> Result<F::Output, UploadError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(UploadError::Cancelled),
            out = fut => Ok(out),
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::adapters::live::SequentialIdGenerator;
    use crate::adapters::memory::MemoryHostFileSystem;
    use crate::ports::{DirectoryReader, HostFuture};

    /// Counts host calls and cancels the token on call number `limit`.
    struct Tripwire {
        cancel: CancellationToken,
        calls: AtomicUsize,
        limit: usize,
    }

    impl Tripwire {
        fn tick(&self) {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.limit {
                self.cancel.cancel();
            }
        }
    }

    struct TripwireHost {
        inner: MemoryHostFileSystem,
        wire: Arc<Tripwire>,
    }

    struct TripwireReader {
        inner: Box<dyn DirectoryReader>,
        wire: Arc<Tripwire>,
    }

    impl DirectoryReader for TripwireReader {
        fn read_entries(&mut self) -> HostFuture<'_, Vec<HostEntry>> {
            self.wire.tick();
            self.inner.read_entries()
        }
    }

    impl HostFileSystem for TripwireHost {
        fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
            self.wire.tick();
            self.inner.entry(location)
        }

        fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
            self.wire.tick();
            self.inner.read_file(entry)
        }

        fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
            self.wire.tick();
            let wire = Arc::clone(&self.wire);
            let opened = self.inner.open_directory(entry);
            Box::pin(async move {
                let reader: Box<dyn DirectoryReader> = Box::new(TripwireReader { inner: opened.await?, wire });
                Ok::<_, HostError>(reader)
            })
        }
    }

    /// Runs a full upload that cancels itself on host call `limit`.
    async fn walk_until(limit: usize, fanout: Fanout) -> (Result<Vec<FileRecord>, UploadError>, usize) {
        let cancel = CancellationToken::new();
        let wire = Arc::new(Tripwire { cancel: cancel.clone(), calls: AtomicUsize::new(0), limit });
        let host = TripwireHost { inner: sample_host().with_batch_size(2), wire: Arc::clone(&wire) };
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids).fanout(fanout).cancel_on(cancel);
        let result = match traversal.resolve(&["proj".to_string()]).await {
            Ok(roots) => traversal.run(&roots).await,
            Err(err) => Err(err),
        };
        (result, wire.calls.load(Ordering::SeqCst))
    }

    /// Delays each file read and logs the order in which reads finish.
    struct SlowHost {
        inner: MemoryHostFileSystem,
        delays: HashMap<String, Duration>,
        finished: Arc<Mutex<Vec<String>>>,
    }

    impl SlowHost {
        fn new() -> Self {
            let inner = MemoryHostFileSystem::new()
                .with_file("p/a/x.txt", "x")
                .with_file("p/b.txt", "b")
                .with_file("p/c/y.txt", "y");
            let delays = [("p/a/x.txt", 40), ("p/b.txt", 20), ("p/c/y.txt", 0)]
                .into_iter()
                .map(|(path, ms)| (path.to_string(), Duration::from_millis(ms)))
                .collect();
            Self { inner, delays, finished: Arc::default() }
        }

        fn finished(&self) -> Vec<String> {
            self.finished.lock().unwrap().clone()
        }
    }

    impl HostFileSystem for SlowHost {
        fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
            self.inner.entry(location)
        }

        fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
            let delay = self.delays.get(&entry.location).copied().unwrap_or_default();
            let location = entry.location.clone();
            let finished = Arc::clone(&self.finished);
            let read = self.inner.read_file(entry);
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                let bytes = read.await?;
                finished.lock().unwrap().push(location);
                Ok(bytes)
            })
        }

        fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
            self.inner.open_directory(entry)
        }
    }

    async fn walk_slow(fanout: Fanout) -> (Vec<String>, Vec<String>) {
        let host = SlowHost::new();
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids).fanout(fanout);
        let roots = traversal.resolve(&["p".to_string()]).await.unwrap();
        let records = traversal.run(&roots).await.unwrap();
        let output = records.into_iter().map(|r| r.path).collect();
        (output, host.finished())
    }

    fn paths(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.path.as_str()).collect()
    }

    fn sample_host() -> MemoryHostFileSystem {
        MemoryHostFileSystem::new()
            .with_file("proj/src/main.rs", "fn main() {}")
            .with_file("proj/src/util/mod.rs", "pub mod x;")
            .with_file("proj/README.md", "# proj")
            .with_file("proj/web/app.tsx", "export {}")
            .with_dir("proj/empty")
    }

    async fn walk(host: &MemoryHostFileSystem, traversal_fanout: Fanout) -> Vec<FileRecord> {
        let ids = SequentialIdGenerator::new("f");
        let traversal = Traversal::new(host, &ids).fanout(traversal_fanout);
        let roots = traversal.resolve(&["proj".to_string()]).await.unwrap();
        traversal.run(&roots).await.unwrap()
    }

    #[tokio::test]
    async fn walks_depth_first_in_host_order() {
        let records = walk(&sample_host(), Fanout::Sequential).await;
        assert_eq!(
            paths(&records),
            vec!["proj/src/main.rs", "proj/src/util/mod.rs", "proj/README.md", "proj/web/app.tsx"]
        );
        let app = &records[3];
        assert_eq!(app.name, "app.tsx");
        assert_eq!(app.language, "typescript");
        assert_eq!(app.content, "export {}");
    }

    #[tokio::test]
    async fn small_batches_still_return_every_child() {
        let host = sample_host().with_batch_size(1);
        assert_eq!(walk(&host, Fanout::Sequential).await.len(), 4);
    }

    #[tokio::test]
    async fn concurrent_fanout_keeps_sequential_order() {
        let host = sample_host().with_batch_size(2);
        let sequential = walk(&host, Fanout::Sequential).await;
        let concurrent = walk(&host, Fanout::Concurrent).await;
        assert_eq!(paths(&sequential), paths(&concurrent));
    }

    #[tokio::test]
    async fn concurrent_reads_overlap_but_output_keeps_host_order() {
        let in_order = vec!["p/a/x.txt", "p/b.txt", "p/c/y.txt"];

        let (output, finished) = walk_slow(Fanout::Sequential).await;
        assert_eq!(output, in_order);
        assert_eq!(finished, in_order);

        let (output, finished) = walk_slow(Fanout::Concurrent).await;
        assert_eq!(output, in_order);
        assert_eq!(finished, vec!["p/c/y.txt", "p/b.txt", "p/a/x.txt"]);
    }

    #[tokio::test]
    async fn root_files_use_their_bare_name() {
        let host = MemoryHostFileSystem::new().with_file("notes.txt", "hi");
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids);
        let roots = traversal.resolve(&["notes.txt".to_string()]).await.unwrap();
        let records = traversal.run(&roots).await.unwrap();
        assert_eq!(paths(&records), vec!["notes.txt"]);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let records = walk(&sample_host(), Fanout::Concurrent).await;
        let mut ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[tokio::test]
    async fn one_unreadable_file_aborts_the_batch() {
        let host = sample_host().failing_read("proj/src/util/mod.rs");
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids);
        let roots = traversal.resolve(&["proj".to_string()]).await.unwrap();

        let err = traversal.run(&roots).await.unwrap_err();
        match err {
            UploadError::ReadFailure { path, .. } => assert_eq!(path, "proj/src/util/mod.rs"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_batch() {
        let host = sample_host().failing_listing("proj/web");
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids).fanout(Fanout::Concurrent);
        let roots = traversal.resolve(&["proj".to_string()]).await.unwrap();

        let err = traversal.run(&roots).await.unwrap_err();
        assert!(matches!(err, UploadError::ListingFailure { ref path, .. } if path == "proj/web"));
    }

    #[tokio::test]
    async fn invalid_utf8_fails_strict_and_passes_lossy() {
        let host = MemoryHostFileSystem::new().with_bytes("bin/blob.dat", vec![0x66, 0xff, 0x6f]);
        let ids = SequentialIdGenerator::default();

        let strict = Traversal::new(&host, &ids);
        let roots = strict.resolve(&["bin".to_string()]).await.unwrap();
        assert!(matches!(strict.run(&roots).await, Err(UploadError::ReadFailure { .. })));

        let lossy = Traversal::new(&host, &ids).decoding(Decoding::Lossy);
        let records = lossy.run(&roots).await.unwrap();
        assert_eq!(records[0].content, "f\u{fffd}o");
    }

    #[tokio::test]
    async fn cancelled_upload_stops() {
        let host = sample_host();
        let ids = SequentialIdGenerator::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let traversal = Traversal::new(&host, &ids).cancel_on(cancel);
        let err = traversal.resolve(&["proj".to_string()]).await.unwrap_err();
        assert!(matches!(err, UploadError::Cancelled));
    }

    #[tokio::test]
    async fn cancelling_at_any_host_call_stops_the_walk() {
        for fanout in [Fanout::Sequential, Fanout::Concurrent] {
            let (result, total) = walk_until(usize::MAX, fanout).await;
            assert_eq!(result.unwrap().len(), 4);
            assert!(total > 5);

            for limit in 1..=total {
                let (result, calls) = walk_until(limit, fanout).await;
                assert!(
                    matches!(result, Err(UploadError::Cancelled)),
                    "{fanout:?} cancelled at call {limit} returned {result:?}"
                );
                assert!(calls <= total);
            }
        }
    }

    #[tokio::test]
    async fn unknown_location_fails_to_resolve() {
        let host = sample_host();
        let ids = SequentialIdGenerator::default();
        let traversal = Traversal::new(&host, &ids);
        let err = traversal.resolve(&["missing".to_string()]).await.unwrap_err();
        assert!(matches!(err, UploadError::Resolve { ref location, .. } if location == "missing"));
    }
}
