//! Upload settings: defaults, `.env` / environment overrides.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::adapters::live::filesystem::DEFAULT_BATCH_SIZE;
use crate::error::ConfigError;

/// Environment variable holding the directory batch size.
pub const BATCH_SIZE_VAR: &str = "CODETREE_BATCH_SIZE";
/// Environment variable selecting `sequential` or `concurrent` fan-out.
pub const FANOUT_VAR: &str = "CODETREE_FANOUT";
/// Environment variable selecting `strict` or `lossy` decoding.
pub const DECODING_VAR: &str = "CODETREE_DECODING";
/// Environment variable naming a cassette file to record host interactions into.
pub const RECORD_VAR: &str = "CODETREE_RECORD";
/// Environment variable naming a cassette file to replay host interactions from.
pub const REPLAY_VAR: &str = "CODETREE_REPLAY";

/// How sibling subtrees are awaited during traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fanout {
    /// Await each child subtree in host order.
    #[default]
    Sequential,
    /// Poll sibling subtrees concurrently on the current task.
    Concurrent,
}

impl FromStr for Fanout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            _ => Err(invalid(FANOUT_VAR, s, "expected `sequential` or `concurrent`")),
        }
    }
}

/// How file bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
    /// Invalid UTF-8 is a read failure that aborts the upload.
    #[default]
    Strict,
    /// Invalid sequences become U+FFFD.
    Lossy,
}

impl FromStr for Decoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lossy" => Ok(Self::Lossy),
            _ => Err(invalid(DECODING_VAR, s, "expected `strict` or `lossy`")),
        }
    }
}

/// Settings for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Children per directory batch handed out by the live host.
    pub batch_size: usize,
    /// Sibling fan-out strategy.
    pub fanout: Fanout,
    /// Byte decoding policy.
    pub decoding: Decoding,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self { batch_size: DEFAULT_BATCH_SIZE, fanout: Fanout::default(), decoding: Decoding::default() }
    }
}

impl UploadOptions {
    /// Loads `.env` if present, then applies `CODETREE_*` overrides to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable has an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup` to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value is unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup(BATCH_SIZE_VAR) {
            options.batch_size = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid(BATCH_SIZE_VAR, &raw, "expected a positive integer")),
            };
        }
        if let Some(raw) = lookup(FANOUT_VAR) {
            options.fanout = raw.parse()?;
        }
        if let Some(raw) = lookup(DECODING_VAR) {
            options.decoding = raw.parse()?;
        }
        Ok(options)
    }
}

/// Where a session's host interactions go, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CassetteMode {
    /// Talk to the real host.
    Live,
    /// Talk to the real host and write every interaction to this file.
    Record(PathBuf),
    /// Serve interactions from this file instead of the host.
    Replay(PathBuf),
}

impl CassetteMode {
    /// Reads `CODETREE_RECORD` / `CODETREE_REPLAY`; replay wins if both are set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CassetteMode::from_env`] with an explicit lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(path) = non_empty(REPLAY_VAR) {
            Self::Replay(PathBuf::from(path))
        } else if let Some(path) = non_empty(RECORD_VAR) {
            Self::Record(PathBuf::from(path))
        } else {
            Self::Live
        }
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { key: key.to_string(), value: value.to_string(), reason: reason.to_string() }
}
