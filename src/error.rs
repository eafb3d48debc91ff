//! Error types for the splay cache
//!
//! Provides unified error handling using thiserror.
//!
//! A missing key is not an error: lookups and removals report absence
//! through `Option`, so nothing here models "not found".

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the splay cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must be a positive number of entries
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Terminal I/O failed in the interactive driver
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Statistics could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the splay cache.
pub type Result<T> = std::result::Result<T, CacheError>;
