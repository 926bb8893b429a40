//! Path precheck feature.
//!
//! This module owns the checks a root directory must pass before a run starts.

use crate::error::{CleanError, Result};
use std::fs;
use std::path::Path;

/// The root must exist, be a directory, and must not be the filesystem root.
pub(crate) fn validate_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).map_err(|_| CleanError::RootNotFound {
        path: root.to_path_buf(),
    })?;

    if !meta.is_dir() {
        return Err(CleanError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }

    let canonical = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    if canonical.parent().is_none() {
        return Err(CleanError::RootIsFilesystemRoot { path: canonical });
    }

    Ok(())
}
