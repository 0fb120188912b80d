//! Filesystem utilities for doclock.
//!
//! This module provides the two filesystem primitives the lock markers rely
//! on: exclusive all-or-nothing file creation and canonical document paths.

mod canonical;
mod publish;

pub use canonical::{MARKER_SUFFIX, canonical_document_path, marker_path_for};
pub use publish::publish_exclusive;
