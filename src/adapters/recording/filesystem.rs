//! Recording adapter for the `HostFileSystem` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::Tape;
use crate::cassette::format::Payload;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{DirectoryReader, HostEntry, HostFileSystem, HostFuture};

/// Records host interactions while delegating to an inner implementation.
pub struct RecordingHostFileSystem {
    inner: Box<dyn HostFileSystem>,
    tape: Tape,
}

impl RecordingHostFileSystem {
    /// Creates a new recording host wrapping the given implementation.
    pub fn new(inner: Box<dyn HostFileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, tape: Tape::new(recorder, "host") }
    }
}

#[derive(Serialize)]
struct LocationInput<'a> {
    location: &'a str,
}

impl HostFileSystem for RecordingHostFileSystem {
    fn entry(&self, location: &str) -> HostFuture<'_, HostEntry> {
        let location = location.to_string();
        Box::pin(async move {
            let result = self.inner.entry(&location).await;
            self.tape.outcome("entry", &LocationInput { location: &location }, &result);
            result
        })
    }

    fn read_file(&self, entry: &HostEntry) -> HostFuture<'_, Vec<u8>> {
        let entry = entry.clone();
        Box::pin(async move {
            let result = self.inner.read_file(&entry).await;
            let payload = result.as_ref().map(|bytes| Payload::from_bytes(bytes.clone()));
            self.tape.outcome("read_file", &LocationInput { location: &entry.location }, &payload);
            result
        })
    }

    fn open_directory(&self, entry: &HostEntry) -> HostFuture<'_, Box<dyn DirectoryReader>> {
        let entry = entry.clone();
        Box::pin(async move {
            let result = self.inner.open_directory(&entry).await;
            let input = LocationInput { location: &entry.location };
            self.tape.outcome("open_directory", &input, &result.as_ref().map(|_| ()));
            result.map(|inner| -> Box<dyn DirectoryReader> {
                Box::new(RecordingDirectoryReader {
                    inner,
                    location: entry.location.clone(),
                    tape: self.tape.clone(),
                })
            })
        })
    }
}

/// Records every batch a wrapped directory reader hands out.
struct RecordingDirectoryReader {
    inner: Box<dyn DirectoryReader>,
    location: String,
    tape: Tape,
}

impl DirectoryReader for RecordingDirectoryReader {
    fn read_entries(&mut self) -> HostFuture<'_, Vec<HostEntry>> {
        Box::pin(async move {
            let result = self.inner.read_entries().await;
            self.tape.outcome("read_entries", &LocationInput { location: &self.location }, &result);
            result
        })
    }
}
