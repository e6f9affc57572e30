//! Service context bundling the port trait objects an upload needs.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::{LiveHostFileSystem, LiveIdGenerator};
use crate::adapters::recording::{RecordingHostFileSystem, RecordingIdGenerator};
use crate::adapters::replaying::{ReplayingHostFileSystem, ReplayingIdGenerator};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::{CassetteReplayer, ReplayError};
use crate::config::{CassetteMode, UploadOptions};
use crate::ports::{HostFileSystem, IdGenerator};

/// Bundles the host and ID generator into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// Host environment the upload reads from.
    pub host: Box<dyn HostFileSystem>,
    /// Source of node identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context over arbitrary adapters.
    #[must_use]
    pub fn with(host: Box<dyn HostFileSystem>, id_gen: Box<dyn IdGenerator>) -> Self {
        Self { host, id_gen, recorder: None }
    }

    /// Creates a live context over the local filesystem.
    #[must_use]
    pub fn live(options: &UploadOptions) -> Self {
        Self::with(
            Box::new(LiveHostFileSystem::new(options.batch_size)),
            Box::new(LiveIdGenerator),
        )
    }

    /// Creates a live context that records every host and ID interaction.
    ///
    /// The cassette is written to `path` when this context is dropped.
    #[must_use]
    pub fn recording(path: &Path, source: &str, options: &UploadOptions) -> Self {
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "codetree-session", source)));
        Self {
            host: Box::new(RecordingHostFileSystem::new(
                Box::new(LiveHostFileSystem::new(options.batch_size)),
                Arc::clone(&recorder),
            )),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Creates a context that replays a recorded cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, ReplayError> {
        let replayer = Arc::new(Mutex::new(CassetteReplayer::load(path)?));
        Ok(Self::with(
            Box::new(ReplayingHostFileSystem::new(Arc::clone(&replayer))),
            Box::new(ReplayingIdGenerator::new(replayer)),
        ))
    }

    /// Creates the context selected by `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn for_mode(
        mode: &CassetteMode,
        source: &str,
        options: &UploadOptions,
    ) -> Result<Self, ReplayError> {
        match mode {
            CassetteMode::Live => Ok(Self::live(options)),
            CassetteMode::Record(path) => {
                info!(cassette = %path.display(), "recording session");
                Ok(Self::recording(path, source, options))
            }
            CassetteMode::Replay(path) => {
                info!(cassette = %path.display(), "replaying session");
                Self::replaying(path)
            }
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else { return };
        let Ok(guard) = recorder.lock() else {
            warn!("cassette recorder lock poisoned; cassette not written");
            return;
        };
        match guard.save() {
            Ok(path) => info!(cassette = %path.display(), "cassette written"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}
