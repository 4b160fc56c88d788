//! Typed errors for the fontmerge library.
//!
//! Callers at the crate boundary can match on these variants; the binary
//! wraps them in `anyhow` with additional context.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for reading, validating and merging font data.
#[derive(Debug, Error)]
pub enum FontMergeError {
    /// A file or directory could not be read or written.
    #[error("I/O error for '{path}': {source}")]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON interchange document could not be parsed.
    #[error("Malformed font data in '{path}': {source}")]
    Json {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A UFO source could not be loaded.
    #[error("Failed to load UFO '{path}': {source}")]
    Ufo {
        /// Path of the UFO directory.
        path: PathBuf,
        /// Underlying norad error.
        #[source]
        source: norad::error::FontLoadError,
    },

    /// The input is neither a `.json` font document nor a `.ufo` directory.
    #[error("Unsupported font source: {0}")]
    UnsupportedFormat(PathBuf),

    /// A kerning table violates its structural invariants.
    #[error("Invalid kerning table '{kern_type}': {reason}")]
    InvalidKerning {
        /// The kern type (e.g. `kern`) the table is stored under.
        kern_type: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The kerning of the requested kern type does not exist.
    #[error("No kerning of type '{0}' in font")]
    MissingKernType(String),

    /// Feature code could not be compiled into a substitution table.
    #[error("Feature compilation failed: {0}")]
    FeatureCompile(String),

    /// Feature code of two fonts could not be merged.
    #[error("Feature merge failed: {0}")]
    FeatureMerge(String),

    /// A blocking loader task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = FontMergeError> = std::result::Result<T, E>;
