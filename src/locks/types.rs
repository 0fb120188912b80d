//! Lock inspection results.

use super::holder::HolderInfo;
use super::staleness::StaleReason;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;

/// Information about an existing marker, as seen by an observer.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// The marker file path.
    pub marker_path: PathBuf,

    /// The recorded holder.
    pub holder: HolderInfo,

    /// When the marker was last modified, if the filesystem reports it.
    pub modified_at: Option<DateTime<Utc>>,

    /// Why the marker would be broken by the next acquisition attempt, if it would.
    pub stale: Option<StaleReason>,
}

impl LockInfo {
    /// Whether the next acquisition attempt would break this marker.
    pub fn is_stale(&self) -> bool {
        self.stale.is_some()
    }

    /// Calculate the age of the marker.
    pub fn age(&self) -> Option<Duration> {
        self.modified_at
            .map(|at| Utc::now().signed_duration_since(at))
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let Some(age) = self.age() else {
            return "unknown".to_string();
        };
        let minutes = age.num_minutes().max(0);
        let hours = age.num_hours().max(0);
        let days = age.num_days().max(0);

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (holder: {}, age: {}{})",
            self.marker_path.display(),
            self.holder,
            self.age_string(),
            match self.stale {
                Some(reason) => format!(", STALE: {}", reason),
                None => String::new(),
            }
        )
    }
}
