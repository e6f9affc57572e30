//! Error types for the upload pipeline.

use thiserror::Error;

/// Error type reported by host adapters.
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// A terminal failure of one upload batch.
///
/// Any variant aborts the whole batch: no records and no tree are produced.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A root location handed over by the host could not be resolved to an entry.
    #[error("failed to resolve {location}: {source}")]
    Resolve {
        /// Host location that was dropped or selected.
        location: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// A file's content could not be read or decoded.
    #[error("failed to read {path}: {source}")]
    ReadFailure {
        /// Relative path of the file within the upload.
        path: String,
        /// Underlying host or decoding error.
        #[source]
        source: HostError,
    },

    /// A directory's children could not be enumerated.
    #[error("failed to list {path}: {source}")]
    ListingFailure {
        /// Relative path of the directory within the upload.
        path: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// The upload was cancelled before it completed.
    #[error("upload cancelled")]
    Cancelled,

    /// The traversed records could not be folded into a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Failure of the tree-building stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A record path was empty or contained a zero-length segment.
    #[error("malformed path {path:?}: empty path segment")]
    MalformedPath {
        /// The offending path.
        path: String,
    },
}

/// Failure of a query against a loaded project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    /// No file exists at the requested path.
    #[error("no file at {path}")]
    NotFound {
        /// The requested path.
        path: String,
    },
}

/// An environment or command-line setting could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The value is not acceptable for the key.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failure_names_the_path() {
        let err = UploadError::ReadFailure { path: "src/a.rs".into(), source: "boom".into() };
        assert_eq!(err.to_string(), "failed to read src/a.rs: boom");
    }

    #[test]
    fn tree_error_converts_into_upload_error() {
        let err: UploadError = TreeError::MalformedPath { path: "a//b".into() }.into();
        assert!(matches!(err, UploadError::Tree(TreeError::MalformedPath { .. })));
        assert!(err.to_string().contains("a//b"));
    }
}
