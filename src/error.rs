//! Error types for the cleaning library
//!
//! Per-file problems (unreadable page, failed rewrite) never surface here: they are
//! narrated through the event sink and the walk moves on. `CleanError` covers the
//! conditions that end a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Directory not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Refusing to clean filesystem root: {}", path.display())]
    RootIsFilesystemRoot { path: PathBuf },

    #[error("Failed to list directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidExclusion {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Cleaning worker stopped unexpectedly")]
    WorkerPanicked,
}

impl CleanError {
    pub fn list_dir(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CleanError::ListDir {
            path: path.into(),
            source,
        }
    }

    pub fn remove(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CleanError::Remove {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
