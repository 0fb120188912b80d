//! doclock: sidecar lock files that keep two program instances from editing
//! the same document.
//!
//! A hosting application creates one [`FileLockRegistry`] per process and
//! calls [`try_lock`](FileLockRegistry::try_lock) when opening a document for
//! writing and [`unlock`](FileLockRegistry::unlock) when closing it. Locks
//! are plain `<document>.lock` files, so they work across processes and
//! across machines sharing a filesystem.
//!
//! ```no_run
//! use doclock::{FileLockRegistry, LockConfig};
//!
//! let registry = FileLockRegistry::new(LockConfig::default().with_app_id("editor/1.4"));
//!
//! if registry.try_lock("/docs/plan.qet") {
//!     // edit...
//!     registry.unlock("/docs/plan.qet");
//! } else if let Some(holder) = registry.lock_info("/docs/plan.qet") {
//!     eprintln!("plan.qet is open in {}", holder);
//! }
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod locks;
pub mod process;

#[cfg(test)]
mod test_support;

pub use config::LockConfig;
pub use error::{LockError, LockErrorKind, Result};
pub use locks::{FileLockRegistry, HolderInfo, LockInfo, LockMarker, StaleReason};
