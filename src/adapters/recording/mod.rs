//! Recording adapters that capture interactions to cassettes.

pub mod filesystem;
pub mod id_gen;

pub use filesystem::RecordingHostFileSystem;
pub use id_gen::RecordingIdGenerator;

use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Writes one port's interactions into a shared cassette recorder.
///
/// Fallible calls are stored as `{"ok": value}` or `{"err": message}`,
/// which is the shape the replaying adapters read back. Recording never
/// fails the call being recorded: values that cannot be serialized are
/// stored as `null` and a poisoned recorder lock is taken over.
#[derive(Clone)]
pub(crate) struct Tape {
    recorder: Arc<Mutex<CassetteRecorder>>,
    port: &'static str,
}

impl Tape {
    pub(crate) fn new(recorder: Arc<Mutex<CassetteRecorder>>, port: &'static str) -> Self {
        Self { recorder, port }
    }

    /// Appends a call whose output cannot fail.
    pub(crate) fn value<I, O>(&self, method: &str, input: &I, output: &O)
    where
        I: Serialize + ?Sized,
        O: Serialize + ?Sized,
    {
        self.append(method, to_json(input), to_json(output));
    }

    /// Appends a fallible call.
    pub(crate) fn outcome<I, T, E>(&self, method: &str, input: &I, result: &Result<T, E>)
    where
        I: Serialize + ?Sized,
        T: Serialize,
        E: Display,
    {
        let output = match result {
            Ok(value) => json!({ "ok": to_json(value) }),
            Err(err) => json!({ "err": err.to_string() }),
        };
        self.append(method, to_json(input), output);
    }

    fn append(&self, method: &str, input: Value, output: Value) {
        let mut recorder = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        recorder.record(self.port, method, input, output);
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        warn!(error = %err, "value could not be recorded");
        Value::Null
    })
}
