//! Shell error types
//!
//! Statement failures are part of the protocol (written as error responses);
//! these errors are for the shell process itself.

use thiserror::Error;

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Shell process errors.
#[derive(Debug, Error)]
pub enum ShellError {
    /// stdin/stdout failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON on a response write
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Seeding could not complete
    #[error("seed failed: {0}")]
    Seed(String),
}
