//! Error types for lvcraft-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for project store operations.
pub type Result<T> = std::result::Result<T, ProjectError>;

/// Errors that prevent a project from being loaded.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// No `lvproj.json` in the start directory or any ancestor.
    #[error("no LVCraft project (lvproj.json) found at or above {0}")]
    NotFound(PathBuf),

    /// The manifest exists but is unusable.
    #[error("invalid project manifest {path}: {message}")]
    InvalidManifest {
        /// Manifest path.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
