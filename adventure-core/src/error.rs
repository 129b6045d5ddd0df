//! Error types for the adventure kernel.
//!
//! Recording outcomes and computing difficulty are total operations and never
//! fail. Only configuration loading and snapshot handling return errors.

use thiserror::Error;

/// Top-level error type for all adventure kernel operations.
#[derive(Error, Debug)]
pub enum AdventureError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A snapshot was written by an incompatible format version.
    #[error("Unsupported snapshot format: version {found} (supported: {supported})")]
    UnsupportedSnapshot {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads and writes.
        supported: u32,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, AdventureError>;
