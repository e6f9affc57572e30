//! Replaying adapter for the `HostFileSystem` port.

use std::sync::{Arc, Mutex};

use futures::future::ready;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::extract_result;
use crate::cassette::format::Payload;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::HostError;
use crate::ports::{DirectoryReader, HostEntry, HostFileSystem, HostFuture};

/// Replays recorded host interactions from a cassette.
///
/// Calls are matched on the location they were made with, so a session
/// recorded with concurrent fan-out replays in any order.
pub struct ReplayingHostFileSystem {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingHostFileSystem {
    /// Creates a new replaying host from a cassette replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

fn replay<T: DeserializeOwned>(
    replayer: &Mutex<CassetteReplayer>,
    method: &str,
    location: &str,
) -> Result<T, HostError> {
    let output = {
        let mut replayer = replayer.lock().map_err(|_| "replayer lock poisoned")?;
        let interaction = replayer.next_matching("host", method, &json!({ "location": location }))?;
        interaction.output.clone()
    };
    extract_result(&output, &format!("host::{method}"))
}

impl HostFileSystem for ReplayingHostFileSystem {
    fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
        Box::pin(ready(replay(&self.replayer, "entry", location)))
    }

    fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
        let result = replay::<Payload>(&self.replayer, "read_file", &entry.location);
        Box::pin(ready(result.map(Payload::into_bytes)))
    }

    fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
        let result = replay::<()>(&self.replayer, "open_directory", &entry.location).map(
            |()| -> Box<dyn DirectoryReader> {
                Box::new(ReplayingDirectoryReader {
                    replayer: Arc::clone(&self.replayer),
                    location: entry.location.clone(),
                })
            },
        );
        Box::pin(ready(result))
    }
}

/// Serves the recorded batches of one directory listing.
struct ReplayingDirectoryReader {
    replayer: Arc<Mutex<CassetteReplayer>>,
    location: String,
}

impl DirectoryReader for ReplayingDirectoryReader {
    fn read_entries(&mut self) -> HostFuture<'_, Vec<HostEntry>> {
        Box::pin(ready(replay(&self.replayer, "read_entries", &self.location)))
    }
}
