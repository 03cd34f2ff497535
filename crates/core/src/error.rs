//! Error types for contract violations.
//!
//! Problems with the shape of lesson content are reported as
//! [`ValidationFinding`](crate::ValidationFinding)s, never as errors.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a caller breaks the compiler's contract.
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not valid UTF-8 text.
    #[error("Input is not valid UTF-8 text: {0}")]
    NotText(#[from] std::str::Utf8Error),

    /// Export was requested while blocking findings exist.
    #[error("Export blocked by {errors} error finding(s)")]
    ExportBlocked { errors: usize },

    /// Style configuration could not be read.
    #[error("Invalid style configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
