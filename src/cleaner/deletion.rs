//! Deletion feature.
//!
//! Removals are permanent: there is no trash or quarantine stage.

use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeleteOutcome {
    Deleted,
    /// The path vanished before or during removal.
    SkippedMissing,
    /// Dry run: nothing was touched.
    Simulated,
}

/// Remove a file, a symlink (never its target) or a whole directory tree.
pub(crate) fn delete_path(path: &Path, is_dir: bool, dry_run: bool) -> io::Result<DeleteOutcome> {
    if dry_run {
        return Ok(DeleteOutcome::Simulated);
    }

    let result = if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(DeleteOutcome::Deleted),
        Err(err) => {
            if fs::symlink_metadata(path).is_err() {
                Ok(DeleteOutcome::SkippedMissing)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_delete_file() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("junk.html");
        fs::write(&file, "x").unwrap();

        assert_eq!(delete_path(&file, false, false).unwrap(), DeleteOutcome::Deleted);
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_dir_tree() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().join(".s");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/a.js"), "x").unwrap();

        assert_eq!(delete_path(&dir, true, false).unwrap(), DeleteOutcome::Deleted);
        assert!(!dir.exists());
    }

    #[test]
    fn test_delete_missing_is_skipped() {
        let temp_dir = create_test_dir();
        let missing = temp_dir.path().join("gone");
        assert_eq!(
            delete_path(&missing, false, false).unwrap(),
            DeleteOutcome::SkippedMissing
        );
    }

    #[test]
    fn test_dry_run_keeps_path() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("junk.html");
        fs::write(&file, "x").unwrap();

        assert_eq!(delete_path(&file, false, true).unwrap(), DeleteOutcome::Simulated);
        assert!(file.exists());
    }
}
