//! Error types for the clockweather binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode of a command run.

use std::path::PathBuf;

/// Top-level error for the clockweather binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: clockweather_core::ConfigError,
    },

    /// Reading or writing the saved clock failed.
    #[error("state file {path}: {source}")]
    StateIo {
        /// Path of the state file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The saved clock could not be parsed, or the report could not be
    /// serialized.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A command-line value was rejected.
    #[error("invalid argument: {message}")]
    Argument {
        /// Description of what is wrong with the argument.
        message: String,
    },
}
