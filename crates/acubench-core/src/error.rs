//! Centralized error types for acubench.
//!
//! Uses thiserror for ergonomic error handling with context. The matrix
//! kernel itself has no error states; these cover the session and CLI layers.

use thiserror::Error;

/// Main error type for benchmark sessions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BenchError {
    /// Invalid benchmark configuration detected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A completed round left the whole result matrix at zero.
    #[error("Empty result matrix after round {round} (n={n})")]
    EmptyResult { round: u64, n: usize },

    /// Worker thread pool could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    /// Check if error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BenchError::Io(_) | BenchError::ThreadPool(_))
    }

    /// Check if error points at a broken kernel rather than the environment.
    pub fn is_kernel_fault(&self) -> bool {
        matches!(self, BenchError::EmptyResult { .. })
    }
}
