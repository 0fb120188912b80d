//! Document locking for doclock.
//!
//! This module keeps two program instances, on one machine or on several
//! machines sharing a filesystem, from editing the same document at once.
//!
//! # Marker Files
//!
//! A lock on `/docs/plan.qet` is the sidecar file `/docs/plan.qet.lock`.
//! Markers are created with exclusive-create semantics, so only one process
//! can acquire a given document at a time.
//!
//! # Marker Content
//!
//! Each marker contains JSON metadata:
//! - `pid`: The process ID of the holder
//! - `hostname`: The machine the holder runs on
//! - `app_id`: The application (and version) that acquired it
//!
//! # Stale Markers
//!
//! A process that crashes leaves its marker behind. The next acquisition
//! attempt breaks it when the recorded process is no longer running on this
//! host, when its PID now belongs to a process started after the marker was
//! written (Linux), or, for markers written on another host, when the marker is older
//! than [`LockConfig::stale_after_minutes`](crate::config::LockConfig).
//!
//! # Limitations
//!
//! Exclusivity is exactly as strong as the filesystem's atomic create. On
//! network filesystems that emulate it, two hosts may both succeed.

mod holder;
mod marker;
mod registry;
mod staleness;
mod types;


// Re-export public API
pub use holder::HolderInfo;
pub use marker::LockMarker;
pub use registry::FileLockRegistry;
pub use staleness::StaleReason;
pub use types::LockInfo;
