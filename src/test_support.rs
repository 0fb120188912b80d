use crate::locks::HolderInfo;
use crate::process::local_hostname;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

/// Hostname guaranteed not to be this machine.
pub(crate) const FOREIGN_HOST: &str = "far-away.invalid";

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Create an empty document and return its canonical path.
pub(crate) fn create_document(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "<project/>\n").unwrap();
    std::fs::canonicalize(path).unwrap()
}

/// Marker path of a canonical document path.
pub(crate) fn marker_of(document: &Path) -> PathBuf {
    crate::fs::marker_path_for(document)
}

/// Write a marker by hand, as a crashed or foreign process would have left it.
pub(crate) fn plant_marker(document: &Path, holder: &HolderInfo) -> PathBuf {
    let marker = marker_of(document);
    std::fs::write(&marker, holder.to_json().unwrap()).unwrap();
    marker
}

pub(crate) fn local_holder(pid: u32) -> HolderInfo {
    HolderInfo {
        pid,
        hostname: local_hostname(),
        app_id: "crashed-editor/0.1".to_string(),
    }
}

pub(crate) fn foreign_holder(pid: u32) -> HolderInfo {
    HolderInfo {
        pid,
        hostname: FOREIGN_HOST.to_string(),
        app_id: "remote-editor/2.0".to_string(),
    }
}

/// Root ignores directory permissions, so permission-failure tests skip.
#[cfg(unix)]
pub(crate) fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

/// Set a directory's unix permission bits.
#[cfg(unix)]
pub(crate) fn set_mode(dir: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(mode)).unwrap();
}

/// Push a file's modification time `minutes` into the past.
pub(crate) fn age_file(path: &Path, minutes: u64) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(minutes * 60))
        .unwrap();
}
