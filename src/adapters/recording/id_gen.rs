//! Recording adapter for the `IdGenerator` port.

use std::sync::{Arc, Mutex};

use super::Tape;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::IdGenerator;

/// Records ID generator interactions while delegating to an inner implementation.
pub struct RecordingIdGenerator {
    inner: Box<dyn IdGenerator>,
    tape: Tape,
}

impl RecordingIdGenerator {
    /// Creates a new recording ID generator wrapping the given implementation.
    pub fn new(inner: Box<dyn IdGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, tape: Tape::new(recorder, "id_gen") }
    }
}

impl IdGenerator for RecordingIdGenerator {
    fn generate_id(&self) -> String {
        let id = self.inner.generate_id();
        self.tape.value("generate_id", &(), &id);
        id
    }
}
