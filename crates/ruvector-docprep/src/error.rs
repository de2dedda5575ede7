//! Error types for the document preparation pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// Run-level preconditions (`SourceMissing`, `SourceEmpty`) abort a run before
/// anything is written. Everything else is raised per source or per record and
/// is tallied by the run instead of stopping it.
#[derive(Debug, Error)]
pub enum Error {
    /// Expected input directory or file is absent
    #[error("Source missing: {0}")]
    SourceMissing(String),

    /// Input exists but contains nothing to convert
    #[error("Source empty: {0}")]
    SourceEmpty(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source file could not be parsed or extracted
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Persisting a record failed
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a missing-source error
    pub fn source_missing(what: impl Into<String>) -> Self {
        Self::SourceMissing(what.into())
    }

    /// Create an empty-source error
    pub fn source_empty(what: impl Into<String>) -> Self {
        Self::SourceEmpty(what.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a write error for `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error should abort the whole run
    pub fn is_run_level(&self) -> bool {
        matches!(self, Error::SourceMissing(_) | Error::SourceEmpty(_) | Error::Config(_))
    }
}
