//! Error types for workspace loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a workspace from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workspace root is missing or is not a directory.
    #[error("Directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory walk failed.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
