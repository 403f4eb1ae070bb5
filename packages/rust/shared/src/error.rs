//! Error types for notepress.
//!
//! Library crates use [`NotepressError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all notepress operations.
#[derive(Debug, thiserror::Error)]
pub enum NotepressError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Notebook JSON or front matter could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unexpected notebook shape, bad file name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The external notebook exporter failed to start or exited non-zero.
    #[error("converter `{command}` failed: {message}")]
    Converter { command: String, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NotepressError>;

impl NotepressError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a converter error for the given command line.
    pub fn converter(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Converter {
            command: command.into(),
            message: msg.into(),
        }
    }
}
