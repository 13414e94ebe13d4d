//! Error types for the memlens core library.
//!
//! The per-turn pipeline itself cannot fail; errors only arise at the
//! edges (loading configuration, importing a seeded memory store).

use thiserror::Error;

/// Top-level error type for all memlens operations.
#[derive(Error, Debug)]
pub enum MemlensError {
    /// Configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MemlensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MemlensError>;
