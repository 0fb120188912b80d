//! Default value functions for `LockConfig`.

/// Application identity written into markers when none is configured.
pub const DEFAULT_APP_ID: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Default value functions for serde
pub(crate) fn default_app_id() -> String {
    DEFAULT_APP_ID.to_string()
}
pub(crate) fn default_stale_after_minutes() -> u32 {
    24 * 60
}
