//! Error types for loading event logs.
//!
//! The compiler itself is total and never returns an error; only the loader
//! (file I/O and wire decoding) can fail.

use thiserror::Error;

/// Errors that can occur when reading an event log.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error on line {line}: {message}")]
    Json {
        line: usize,
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for event-log loading.
pub type TimelineResult<T> = Result<T, TimelineError>;
