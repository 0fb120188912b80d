//! Stale-marker detection and breaking.
//!
//! A marker is stale when:
//! - its content cannot be decoded (left half-written or damaged),
//! - it was written on this host by a process that is no longer running,
//! - its PID now belongs to a process started after the marker was written
//!   (Linux only, where start times are available), or
//! - it was written on another host (or on a platform without a liveness
//!   probe) and has not been modified for longer than the configured threshold.

use super::holder::HolderInfo;
use crate::config::LockConfig;
use crate::error::{LockError, Result};
use crate::process::{is_process_alive, process_started_at};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Why a marker is considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The content could not be decoded.
    Corrupt,
    /// The recorded local process is not running.
    DeadProcess,
    /// The recorded PID was reused by a process started after the marker.
    PidReused,
    /// The marker is older than the cross-host threshold.
    Expired,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StaleReason::Corrupt => "unreadable content",
            StaleReason::DeadProcess => "holder process is gone",
            StaleReason::PidReused => "holder PID now belongs to a newer process",
            StaleReason::Expired => "older than the stale threshold",
        };
        f.write_str(text)
    }
}

/// Allowed clock skew between a process start time and its marker's mtime.
const PID_REUSE_SLACK_SECS: i64 = 120;

/// Outcome of examining a marker that blocked an acquisition.
#[derive(Debug)]
pub(crate) enum Verdict {
    /// A live holder owns the marker.
    Live(HolderInfo),
    /// The marker may be broken. `snapshot` holds the bytes that were judged.
    Stale {
        reason: StaleReason,
        snapshot: Vec<u8>,
    },
    /// The marker disappeared before it could be read.
    Vanished,
}

/// Examine the marker at `marker_path`.
pub(crate) fn assess(marker_path: &Path, config: &LockConfig) -> Result<Verdict> {
    let snapshot = match fs::read(marker_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Verdict::Vanished),
        Err(e) => {
            return Err(LockError::IoFailure(format!(
                "failed to read marker '{}': {}",
                marker_path.display(),
                e
            )));
        }
    };

    let holder = match HolderInfo::decode(&snapshot) {
        Ok(holder) => holder,
        Err(_) => {
            return Ok(Verdict::Stale {
                reason: StaleReason::Corrupt,
                snapshot,
            });
        }
    };

    match judge(&holder, modified_at(marker_path), config) {
        Some(reason) => Ok(Verdict::Stale { reason, snapshot }),
        None => Ok(Verdict::Live(holder)),
    }
}

/// Decide whether a decoded marker is stale.
pub(crate) fn judge(
    holder: &HolderInfo,
    modified_at: Option<DateTime<Utc>>,
    config: &LockConfig,
) -> Option<StaleReason> {
    if holder.is_local() {
        match is_process_alive(holder.pid) {
            Some(true) if started_after(holder.pid, modified_at) => {
                return Some(StaleReason::PidReused);
            }
            Some(true) => return None,
            Some(false) => return Some(StaleReason::DeadProcess),
            None => {}
        }
    }

    // An unknown modification time never makes a marker stale.
    let modified_at = modified_at?;
    let age = Utc::now().signed_duration_since(modified_at);
    (age > config.stale_after()).then_some(StaleReason::Expired)
}

/// Whether the process running as `pid` started after the marker was written.
///
/// A holder writes its marker after it starts, so a later start time means
/// the PID was recycled. Unknown times never count.
fn started_after(pid: u32, modified_at: Option<DateTime<Utc>>) -> bool {
    match (process_started_at(pid), modified_at) {
        (Some(started), Some(written)) => {
            started > written + Duration::seconds(PID_REUSE_SLACK_SECS)
        }
        _ => false,
    }
}

/// Modification time of a file, if available.
pub(crate) fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Delete a stale marker, provided it still holds the bytes that were judged.
///
/// # Returns
///
/// * `Ok(true)` - The marker was removed
/// * `Ok(false)` - The marker changed or disappeared in the meantime
/// * `Err(LockError::IoFailure)` - The marker could not be removed
pub(crate) fn break_stale(marker_path: &Path, snapshot: &[u8]) -> Result<bool> {
    match fs::read(marker_path) {
        Ok(current) if current == snapshot => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(LockError::IoFailure(format!(
                "failed to re-read stale marker '{}': {}",
                marker_path.display(),
                e
            )));
        }
    }

    match fs::remove_file(marker_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LockError::IoFailure(format!(
            "failed to remove stale marker '{}': {}",
            marker_path.display(),
            e
        ))),
    }
}
