//! Adapters implementing the port traits.
//!
//! - `live`: the real filesystem and UUIDs.
//! - `memory`: an in-memory host for tests and demos.
//! - `recording`: wraps another adapter and writes interactions to a cassette.
//! - `replaying`: serves interactions back from a cassette.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;

use std::collections::VecDeque;

use crate::ports::{DirectoryReader, HostEntry, HostFuture};

/// Hands out an already-known listing in fixed-size batches, then an empty one.
pub(crate) struct BatchedReader {
    pending: VecDeque<HostEntry>,
    batch_size: usize,
}

impl BatchedReader {
    pub(crate) fn new(children: Vec<HostEntry>, batch_size: usize) -> Self {
        Self { pending: children.into(), batch_size: batch_size.max(1) }
    }
}

impl DirectoryReader for BatchedReader {
    fn read_entries(&mut self) -> HostFuture<'_, Vec<HostEntry>> {
        let take = self.batch_size.min(self.pending.len());
        let batch: Vec<HostEntry> = self.pending.drain(..take).collect();
        Box::pin(futures::future::ready(Ok(batch)))
    }
}
