//! Exclusive, all-or-nothing file creation.
//!
//! A marker must never be observed half-written by another process, and it
//! must never replace a marker that already exists.
//!
//! # Implementation Strategy
//!
//! 1. Write content to a private temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Hard-link the temporary file to the target name; `link()` fails with
//!    `EEXIST` when the target exists, so exactly one racing creator wins
//! 4. Remove the temporary name
//!
//! # Cross-Platform Behavior
//!
//! Some filesystems (FAT, several SMB and FUSE mounts) refuse hard links. On
//! those, publishing falls back to `create_new` followed by write and sync.
//! The target is still created exclusively, but a concurrent reader may see
//! it before its content is complete.
//!
//! # Important Notes
//!
//! - On crash between steps 1 and 4, a temporary file may remain (named
//!   `.doclock.{pid}-{n}.tmp`)
//! - The temporary name has a fixed, short length so any target whose own
//!   name fits the filesystem's limit can be published
//! - Over network filesystems exclusivity is only as strong as the server's
//!   `link`/`O_EXCL` implementation

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create `target` holding exactly `content`, failing if it already exists.
///
/// # Returns
///
/// * `Ok(())` - The target now exists with the given content
/// * `Err(e)` with `e.kind() == ErrorKind::AlreadyExists` - Someone else holds the name
/// * `Err(e)` - Any other filesystem failure
pub fn publish_exclusive(target: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = generate_temp_path(target)?;

    write_and_sync(&temp_path, content)?;

    let linked = fs::hard_link(&temp_path, target);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => {
            sync_parent(target);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(e),
        Err(e) => {
            tracing::debug!(
                path = %target.display(),
                error = %e,
                "hard link refused, falling back to exclusive create"
            );
            create_new_and_write(target, content)
        }
    }
}

/// Generate a temporary file path in the same directory as the target.
///
/// The name is unique per process and per call, so concurrent publishers
/// never share a temporary file. It does not embed the target's name.
fn generate_temp_path(target: &Path) -> io::Result<PathBuf> {
    if target.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", target.display()),
        ));
    }
    let parent = target.parent().unwrap_or(Path::new("."));

    let temp_name = format!(
        ".doclock.{}-{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    Ok(parent.join(temp_name))
}

/// Write content to a fresh temporary file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if written.is_err() {
        let _ = fs::remove_file(path);
    }
    written
}

/// Fallback for filesystems without hard links.
fn create_new_and_write(target: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if written.is_err() {
        // A partial marker would read as corrupt; don't leave one behind.
        let _ = fs::remove_file(target);
    }
    written
}

/// Persist the new directory entry.
#[cfg(unix)]
fn sync_parent(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = fs::File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) {}
