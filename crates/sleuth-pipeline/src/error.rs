//! Error types for the pipeline
//!
//! Only [`PipelineError`] ever aborts a run. The per-item errors are turned
//! into values (a fetch error message, an analysis error, a write failure)
//! and reported next to the successes.

use std::path::PathBuf;
use thiserror::Error;

/// Batch-level errors that stop a run before any work starts
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input list contained no sources
    #[error("No JS paths/URLs found in input")]
    EmptyInput,

    /// The input list could not be read
    #[error("Input file not readable: {}: {reason}", path.display())]
    InputUnreadable {
        /// Path that was requested
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client for the fetch stage could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Why a single source could not be retrieved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Neither a remote locator nor an existing local path
    #[error("Invalid path")]
    InvalidSource,

    /// The remote answered with something other than 200
    #[error("HTTP {0}")]
    Status(u16),

    /// Connection, DNS, timeout or body decoding failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// The local file exists but could not be read as text
    #[error("Read failed: {0}")]
    Read(String),
}

/// Why a record could not be persisted
#[derive(Error, Debug)]
pub enum RecordError {
    /// Filesystem error while creating the directory or writing the file
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Destination of the failed write
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
        assert_eq!(FetchError::InvalidSource.to_string(), "Invalid path");
        assert!(FetchError::Transport("connection refused".into())
            .to_string()
            .contains("connection refused"));
    }

    #[test]
    fn test_input_unreadable_mentions_path() {
        let err = PipelineError::InputUnreadable {
            path: PathBuf::from("missing.txt"),
            reason: "No such file or directory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missing.txt"));
        assert!(msg.contains("No such file"));
    }
}
