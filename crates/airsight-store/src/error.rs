//! Error types for airsight-store.

use std::path::PathBuf;

use airsight_core::PersistenceError;

/// Result type for airsight-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in airsight-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The database was written by a newer release.
    #[error("Unsupported schema version {found} (expected at most {supported})")]
    UnsupportedSchema { found: i32, supported: i32 },
}

impl From<Error> for PersistenceError {
    fn from(err: Error) -> Self {
        PersistenceError::Backend(err.to_string())
    }
}
