//! Process-wide table of held document locks.

use super::holder::HolderInfo;
use super::marker::LockMarker;
use super::types::LockInfo;
use crate::config::LockConfig;
use crate::error::Result;
use crate::fs::canonical_document_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// The set of documents this process holds locks on.
///
/// Create one per process and hand it (typically behind an `Arc`) to the
/// code that opens and closes documents. Every operation runs under a single
/// mutex, so concurrent callers never race on the same canonical path.
///
/// Dropping the registry releases every marker it still holds.
#[derive(Debug, Default)]
pub struct FileLockRegistry {
    config: LockConfig,
    held: Mutex<HashMap<PathBuf, LockMarker>>,
}

impl FileLockRegistry {
    /// Create an empty registry that acquires markers with `config`.
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            held: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration markers are acquired with.
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Try to lock `path` for this process.
    ///
    /// Returns `true` if this process now holds the lock, including when it
    /// already did. Returns `false` when the document is held elsewhere, when
    /// the path cannot be resolved, or on any I/O failure; use
    /// [`inspect`](Self::inspect) to find out which.
    pub fn try_lock<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let mut held = self.table();

        let canonical = match canonical_document_path(path) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "lock not acquired");
                return false;
            }
        };

        if held.contains_key(&canonical) {
            return true;
        }

        match LockMarker::create_and_acquire(&canonical, &self.config) {
            Ok(marker) => {
                held.insert(canonical, marker);
                true
            }
            Err(e) => {
                debug!(path = %canonical.display(), error = %e, "lock not acquired");
                false
            }
        }
    }

    /// Release this process's lock on `path`.
    ///
    /// Unlocking a path this process does not hold is a no-op. A marker that
    /// cannot be deleted is logged, not reported.
    pub fn unlock<P: AsRef<Path>>(&self, path: P) {
        let mut held = self.table();

        let Ok(canonical) = canonical_document_path(path) else {
            return;
        };

        if let Some(marker) = held.remove(&canonical)
            && let Err(e) = marker.release()
        {
            warn!(path = %canonical.display(), error = %e, "failed to release lock");
        }
    }

    /// Whether this process holds the lock on `path`.
    ///
    /// This does not report locks held by other processes; see
    /// [`lock_info`](Self::lock_info) for that.
    pub fn is_locked_by_self<P: AsRef<Path>>(&self, path: P) -> bool {
        let held = self.table();

        canonical_document_path(path)
            .map(|canonical| held.contains_key(&canonical))
            .unwrap_or(false)
    }

    /// Who holds the lock on `path`, whether or not it is this process.
    ///
    /// Returns `None` when the document is unlocked and also when its marker
    /// cannot be read; [`inspect`](Self::inspect) tells the two apart.
    pub fn lock_info<P: AsRef<Path>>(&self, path: P) -> Option<HolderInfo> {
        let _held = self.table();
        LockMarker::read_holder_info(path).ok()
    }

    /// Describe the marker on `path`, reporting why none could be read.
    ///
    /// # Returns
    ///
    /// * `Ok(LockInfo)` - Holder, marker age, and stale judgement
    /// * `Err(LockError::NotLocked)` - No marker exists
    /// * `Err(LockError::Corrupt)` - The marker cannot be decoded
    /// * `Err(LockError::InvalidPath)` / `Err(LockError::IoFailure)` - Lookup failed
    pub fn inspect<P: AsRef<Path>>(&self, path: P) -> Result<LockInfo> {
        let _held = self.table();
        LockMarker::inspect(path, &self.config)
    }

    /// Canonical paths of every document this process holds, sorted.
    pub fn held_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.table().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Release every lock this process holds.
    pub fn release_all(&self) {
        let mut held = self.table();

        for (canonical, marker) in held.drain() {
            if let Err(e) = marker.release() {
                warn!(path = %canonical.display(), error = %e, "failed to release lock");
            }
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<PathBuf, LockMarker>> {
        // Entries are inserted and removed whole, so a panic elsewhere never
        // leaves the table inconsistent.
        self.held.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}
