//! Replaying adapter for the `IdGenerator` port.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::id_gen::IdGenerator;

/// Replays recorded IDs from a cassette, strictly in recorded order.
///
/// Only a session identical to the recorded one may replay through this
/// generator. A session that mints more IDs than the cassette holds has
/// diverged from the recording and panics.
pub struct ReplayingIdGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    /// # Panics
    ///
    /// Panics if the cassette holds no further IDs or the next recorded
    /// output is not a string. Either way the session has diverged from the
    /// recording.
    fn generate_id(&self) -> String {
        let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
        let interaction = replayer
            .next_interaction("id_gen", "generate_id")
            .unwrap_or_else(|e| panic!("replayed session diverged from the recording: {e}"));
        match interaction.output.as_str() {
            Some(id) => id.to_string(),
            None => panic!(
                "replayed session diverged from the recording: generate_id #{} holds {}",
                interaction.seq, interaction.output
            ),
        }
    }
}
