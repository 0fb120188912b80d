//! Holder identity and its on-disk encoding.

use crate::error::{LockError, Result};
use crate::process::local_hostname;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Identity of the process that wrote a marker.
///
/// Serialized as a JSON object. Fields added by later versions are ignored
/// when reading, so older readers keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderInfo {
    /// OS process id of the holder at acquisition time.
    pub pid: u32,

    /// Machine name of the holder.
    pub hostname: String,

    /// Application that acquired the lock (name and version).
    pub app_id: String,
}

impl HolderInfo {
    /// Identity of the calling process.
    pub fn current(app_id: &str) -> Self {
        Self {
            pid: std::process::id(),
            hostname: local_hostname(),
            app_id: app_id.to_string(),
        }
    }

    /// Whether the holder ran on this machine, so its PID can be probed.
    pub fn is_local(&self) -> bool {
        self.hostname == local_hostname()
    }

    /// Parse holder info from a marker file.
    ///
    /// # Returns
    ///
    /// * `Ok(HolderInfo)` - The marker exists and decodes
    /// * `Err(LockError::NotLocked)` - No marker at `path`
    /// * `Err(LockError::Corrupt)` - The marker exists but cannot be decoded
    /// * `Err(LockError::IoFailure)` - The marker could not be read
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LockError::NotLocked(format!("no marker at '{}'", path.display()))
            } else {
                LockError::IoFailure(format!(
                    "failed to read marker '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        Self::decode(&content)
            .map_err(|reason| LockError::Corrupt(format!("'{}': {}", path.display(), reason)))
    }

    /// Serialize holder info to the marker's JSON form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LockError::IoFailure(format!("failed to serialize holder info: {}", e))
        })
    }

    /// Decode marker content.
    ///
    /// Besides the JSON form, the line layout used by older desktop releases
    /// is accepted: pid, application name and hostname on the first three
    /// lines, followed by optional lines that are ignored.
    pub(crate) fn decode(content: &[u8]) -> std::result::Result<Self, String> {
        let text = std::str::from_utf8(content).map_err(|e| format!("not UTF-8: {}", e))?;
        let trimmed = text.trim_start();

        if trimmed.is_empty() {
            return Err("marker is empty".to_string());
        }

        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|e| e.to_string());
        }

        decode_lines(text)
    }
}

fn decode_lines(text: &str) -> std::result::Result<HolderInfo, String> {
    let mut lines = text.lines();

    let pid = lines
        .next()
        .and_then(|l| l.trim().parse::<u32>().ok())
        .ok_or_else(|| "first line is not a process id".to_string())?;
    let app_id = lines
        .next()
        .ok_or_else(|| "missing application line".to_string())?;
    let hostname = lines
        .next()
        .ok_or_else(|| "missing hostname line".to_string())?;

    Ok(HolderInfo {
        pid,
        hostname: hostname.trim().to_string(),
        app_id: app_id.trim().to_string(),
    })
}

impl fmt::Display for HolderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.pid, self.hostname, self.app_id)
    }
}
