//! Error types for keysift-io.

use thiserror::Error;

/// Errors during recording and checkpoint I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// File path does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// File data did not match the expected format.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;
