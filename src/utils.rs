//! Shared filesystem helpers

use std::path::Path;

/// Returns true if this path is a Windows reparse point (junction/symlink/mount point).
///
/// `FileType::is_symlink` does not report every kind of reparse point, and a
/// junction walked as a normal directory can loop back onto its own ancestors.
pub fn is_windows_reparse_point(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if let Ok(meta) = std::fs::symlink_metadata(path) {
            return meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        }
        false
    }
    #[cfg(not(windows))]
    {
        let _ = path;
        false
    }
}

/// True for entries that must never be followed: symlinks and reparse points.
pub fn is_link_like(file_type: &std::fs::FileType, path: &Path) -> bool {
    file_type.is_symlink() || is_windows_reparse_point(path)
}
