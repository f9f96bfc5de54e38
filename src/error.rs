//! Error types for cave generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CaveError`].
pub type Result<T> = std::result::Result<T, CaveError>;

/// Errors that can occur while generating a cave.
#[derive(Error, Debug)]
pub enum CaveError {
    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// The parameters produced a map with nothing to build on.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Internal consistency check failed (mesh topology, node bookkeeping).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading a configuration file.
    #[error("failed to read config from {}: {message}", .path.display())]
    Config {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl CaveError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        CaveError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
