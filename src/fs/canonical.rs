//! Document path canonicalization and marker path derivation.

use crate::error::{LockError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to a canonical document path to name its marker.
pub const MARKER_SUFFIX: &str = ".lock";

/// Resolve `path` to the absolute, symlink-free form used as a lock identity.
///
/// Relative paths are resolved against the current working directory. The
/// path must exist.
pub fn canonical_document_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();

    if path.as_os_str().is_empty() {
        return Err(LockError::InvalidPath("empty path".to_string()));
    }

    std::fs::canonicalize(path)
        .map_err(|e| LockError::InvalidPath(format!("'{}': {}", path.display(), e)))
}

/// Path of the marker for an already canonical document path.
pub fn marker_path_for(canonical: &Path) -> PathBuf {
    let mut marker: OsString = canonical.as_os_str().to_os_string();
    marker.push(MARKER_SUFFIX);
    PathBuf::from(marker)
}
