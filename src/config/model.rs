//! LockConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for lock acquisition.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Identity of the acquiring application, recorded in every marker
    /// (e.g., "MyEditor/2.1").
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Minutes after which a marker written on another host is considered stale.
    ///
    /// Markers written on this host are judged by PID liveness instead.
    #[serde(default = "default_stale_after_minutes")]
    pub stale_after_minutes: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            stale_after_minutes: default_stale_after_minutes(),
        }
    }
}
