//! Replays recorded interactions from a cassette.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// A cassette could not be loaded or has no interaction for a call.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The cassette file could not be read or parsed.
    #[error("failed to load cassette {path}: {reason}")]
    Load {
        /// Cassette file path.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// Every interaction for the call has been consumed, or none was recorded.
    #[error("cassette exhausted: no interaction left for {port}::{method} with input {input}")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Input the call was made with.
        input: serde_json::Value,
    },
}

struct Slot {
    interaction: Interaction,
    used: bool,
}

/// Replays interactions from a loaded cassette, serving them per
/// port/method pair in recorded order.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Slot>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Slot>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(Slot { interaction: interaction.clone(), used: false });
        }
        Self { queues }
    }

    /// Load a cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let load_error =
            |reason: String| ReplayError::Load { path: path.display().to_string(), reason };
        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let cassette: Cassette =
            serde_yaml::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        Ok(Self::new(&cassette))
    }

    /// Return the next unconsumed interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Exhausted`] if none is left.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<&Interaction, ReplayError> {
        self.take(port, method, None)
    }

    /// Return the first unconsumed interaction for the port and method that
    /// was recorded with exactly `input`.
    ///
    /// Matching on input lets calls that were recorded concurrently replay
    /// in any order.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Exhausted`] if none is left.
    pub fn next_matching(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<&Interaction, ReplayError> {
        self.take(port, method, Some(input))
    }

    fn take(
        &mut self,
        port: &str,
        method: &str,
        input: Option<&serde_json::Value>,
    ) -> Result<&Interaction, ReplayError> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        let slot = self.queues.get_mut(&key).and_then(|queue| {
            queue
                .iter_mut()
                .find(|slot| !slot.used && input.map_or(true, |i| slot.interaction.input == *i))
        });
        match slot {
            Some(slot) => {
                slot.used = true;
                Ok(&slot.interaction)
            }
            None => Err(ReplayError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                input: input.cloned().unwrap_or(serde_json::Value::Null),
            }),
        }
    }
}
