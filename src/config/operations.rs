//! Config loading, validation, and builder operations.

use super::model::LockConfig;
use crate::error::{LockError, Result};
use chrono::Duration;
use std::path::Path;

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(LockConfig)` - Successfully loaded and validated config
    /// * `Err(LockError::InvalidConfig)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::InvalidConfig(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LockConfig = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::InvalidConfig(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            LockError::InvalidConfig(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `app_id` must be non-empty and fit on one line
    /// - `stale_after_minutes` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(LockError::InvalidConfig(
                "app_id must not be empty".to_string(),
            ));
        }

        if self.app_id.contains(['\n', '\r']) {
            return Err(LockError::InvalidConfig(format!(
                "app_id must be a single line (found {:?})",
                self.app_id
            )));
        }

        if self.stale_after_minutes == 0 {
            return Err(LockError::InvalidConfig(
                "stale_after_minutes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Return a copy of this config with a different application identity.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Return a copy of this config with a different cross-host stale threshold.
    pub fn with_stale_after_minutes(mut self, minutes: u32) -> Self {
        self.stale_after_minutes = minutes;
        self
    }

    /// The cross-host stale threshold as a duration.
    pub fn stale_after(&self) -> Duration {
        Duration::minutes(i64::from(self.stale_after_minutes))
    }
}
