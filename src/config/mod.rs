//! Configuration model for doclock.
//!
//! This module defines the `LockConfig` struct that a hosting application
//! passes to its registry, optionally loaded from a YAML file. It supports
//! forward-compatible YAML parsing (unknown fields are ignored), sensible
//! defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::LockConfig;
