//! Sidecar marker files.

use super::holder::HolderInfo;
use super::staleness::{self, Verdict};
use super::types::LockInfo;
use crate::config::LockConfig;
use crate::error::{LockError, Result};
use crate::fs::{canonical_document_path, marker_path_for, publish_exclusive};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An acquired marker for one document.
///
/// When dropped, the marker file is deleted. If deletion fails, a warning is
/// logged but no panic occurs.
#[derive(Debug)]
pub struct LockMarker {
    /// Path to the marker file.
    path: PathBuf,

    /// Canonical path of the locked document.
    document: PathBuf,

    /// What this process wrote into the marker.
    holder: HolderInfo,

    /// Whether the marker has been released manually.
    released: bool,
}

impl LockMarker {
    /// Acquire the marker for `document`.
    ///
    /// The marker is published with exclusive-create semantics. If one
    /// already exists, it is examined: a stale marker is broken and the
    /// acquisition retried exactly once.
    ///
    /// # Returns
    ///
    /// * `Ok(LockMarker)` - The marker now names this process
    /// * `Err(LockError::AlreadyLocked)` - A live holder owns the document
    /// * `Err(LockError::InvalidPath)` - `document` cannot be canonicalized
    /// * `Err(LockError::IoFailure)` - The marker could not be created, read or broken
    pub fn create_and_acquire<P: AsRef<Path>>(document: P, config: &LockConfig) -> Result<Self> {
        let document = canonical_document_path(document)?;
        let path = marker_path_for(&document);
        let holder = HolderInfo::current(&config.app_id);
        let content = holder.to_json()?;

        if publish(&path, &content)? {
            return Ok(Self::new(path, document, holder));
        }

        clear_conflict(&path, &document, config)?;
        Self::publish_after_break(path, document, holder, &content)
    }

    /// The single retry after a conflicting marker was cleared. Losing it
    /// means another process published first.
    pub(super) fn publish_after_break(
        path: PathBuf,
        document: PathBuf,
        holder: HolderInfo,
        content: &str,
    ) -> Result<Self> {
        if publish(&path, content)? {
            Ok(Self::new(path, document, holder))
        } else {
            Err(LockError::AlreadyLocked(format!(
                "'{}' was taken by another process",
                document.display()
            )))
        }
    }

    /// Read the holder of `document`'s marker without acquiring it.
    ///
    /// Never creates, deletes or modifies the marker.
    pub fn read_holder_info<P: AsRef<Path>>(document: P) -> Result<HolderInfo> {
        let document = canonical_document_path(document)?;
        HolderInfo::from_file(marker_path_for(&document))
    }

    /// Read the holder of `document`'s marker along with its age and
    /// whether the next acquisition attempt would break it.
    pub fn inspect<P: AsRef<Path>>(document: P, config: &LockConfig) -> Result<LockInfo> {
        let document = canonical_document_path(document)?;
        let marker_path = marker_path_for(&document);

        let holder = HolderInfo::from_file(&marker_path)?;
        let modified_at = staleness::modified_at(&marker_path);
        let stale = staleness::judge(&holder, modified_at, config);

        Ok(LockInfo {
            marker_path,
            holder,
            modified_at,
            stale,
        })
    }

    fn new(path: PathBuf, document: PathBuf, holder: HolderInfo) -> Self {
        Self {
            path,
            document,
            holder,
            released: false,
        }
    }

    /// Get the path to the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the canonical path of the locked document.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Get the holder info written into the marker.
    pub fn holder(&self) -> &HolderInfo {
        &self.holder
    }

    /// Release the marker, deleting the file.
    ///
    /// A marker that is already gone counts as released. So does one that
    /// now names a different holder (it was broken and re-acquired
    /// elsewhere); that marker is left in place.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        remove_owned(&self.path, &self.holder)
    }
}

impl Drop for LockMarker {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = remove_owned(&self.path, &self.holder)
        {
            warn!(path = %self.path.display(), error = %e, "failed to release lock marker");
        }
    }
}

/// Deal with the marker that blocked an acquisition of `document`.
///
/// A live holder is reported as `AlreadyLocked`; a stale marker is broken.
pub(super) fn clear_conflict(path: &Path, document: &Path, config: &LockConfig) -> Result<()> {
    match staleness::assess(path, config)? {
        Verdict::Live(existing) => Err(LockError::AlreadyLocked(format!(
            "'{}' is held by {}",
            document.display(),
            existing
        ))),
        Verdict::Stale { reason, snapshot } => {
            if staleness::break_stale(path, &snapshot)? {
                info!(path = %path.display(), %reason, "broke stale lock marker");
            }
            Ok(())
        }
        Verdict::Vanished => {
            debug!(path = %path.display(), "marker released during acquisition");
            Ok(())
        }
    }
}

/// Publish marker content, mapping contention to `Ok(false)`.
fn publish(path: &Path, content: &str) -> Result<bool> {
    match publish_exclusive(path, content.as_bytes()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LockError::IoFailure(format!(
            "failed to create marker '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Delete the marker at `path` if it still names `holder`.
fn remove_owned(path: &Path, holder: &HolderInfo) -> Result<()> {
    match HolderInfo::from_file(path) {
        Ok(current) if current != *holder => {
            warn!(
                path = %path.display(),
                holder = %current,
                "marker was taken over by another holder, leaving it in place"
            );
            return Ok(());
        }
        Err(LockError::NotLocked(_)) => {
            debug!(path = %path.display(), "marker already removed");
            return Ok(());
        }
        // Ours, or unreadable: remove it either way.
        _ => {}
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LockError::IoFailure(format!(
            "failed to release marker '{}': {}",
            path.display(),
            e
        ))),
    }
}
