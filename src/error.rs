//! Error types for doclock.
//!
//! Uses thiserror for derive macros. Every variant carries a message that
//! names the path involved so it can be shown to a user as-is.

use thiserror::Error;

/// Main error type for lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The document path could not be canonicalized (missing, unreadable parent, malformed).
    #[error("invalid document path: {0}")]
    InvalidPath(String),

    /// A live holder currently owns the marker.
    #[error("document is locked: {0}")]
    AlreadyLocked(String),

    /// A filesystem operation failed for a reason other than contention.
    #[error("lock I/O failed: {0}")]
    IoFailure(String),

    /// The marker exists but its content cannot be decoded.
    #[error("corrupt lock marker: {0}")]
    Corrupt(String),

    /// No marker exists for the document.
    #[error("document is not locked: {0}")]
    NotLocked(String),

    /// Configuration could not be loaded or failed validation.
    #[error("invalid lock configuration: {0}")]
    InvalidConfig(String),
}

/// Discriminant of a [`LockError`], for callers that branch on the failure
/// without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockErrorKind {
    InvalidPath,
    AlreadyLocked,
    IoFailure,
    Corrupt,
    NotLocked,
    InvalidConfig,
}

impl LockError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> LockErrorKind {
        match self {
            LockError::InvalidPath(_) => LockErrorKind::InvalidPath,
            LockError::AlreadyLocked(_) => LockErrorKind::AlreadyLocked,
            LockError::IoFailure(_) => LockErrorKind::IoFailure,
            LockError::Corrupt(_) => LockErrorKind::Corrupt,
            LockError::NotLocked(_) => LockErrorKind::NotLocked,
            LockError::InvalidConfig(_) => LockErrorKind::InvalidConfig,
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            LockError::AlreadyLocked("a".to_string()).kind(),
            LockErrorKind::AlreadyLocked
        );
        assert_eq!(
            LockError::NotLocked("a".to_string()).kind(),
            LockErrorKind::NotLocked
        );
        assert_eq!(
            LockError::Corrupt("a".to_string()).kind(),
            LockErrorKind::Corrupt
        );
        assert_eq!(
            LockError::InvalidConfig("a".to_string()).kind(),
            LockErrorKind::InvalidConfig
        );
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LockError::AlreadyLocked("/docs/a.qet.lock held by 42@host".to_string());
        assert_eq!(
            err.to_string(),
            "document is locked: /docs/a.qet.lock held by 42@host"
        );

        let err = LockError::InvalidPath("'/nope': No such file or directory".to_string());
        assert!(err.to_string().starts_with("invalid document path:"));
    }
}
