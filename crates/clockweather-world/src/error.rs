//! Error types for the `clockweather-world` crate.
//!
//! Only the strict table loaders return [`TableError`]. Lookup, derivation
//! and effect mapping are total and never fail.

use std::path::PathBuf;

/// Errors that can occur while loading a weather table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read weather table {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The table document is not valid JSON of the expected shape.
    #[error("failed to parse weather table: {source}")]
    Json {
        /// The underlying parse error.
        #[from]
        source: serde_json::Error,
    },
}
