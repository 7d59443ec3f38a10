//! Error types for scull
//!
//! Provides a unified error type for all device operations.

use thiserror::Error;

/// Result type alias using ScullError
pub type Result<T> = std::result::Result<T, ScullError>;

/// Unified error type for scull operations
#[derive(Debug, Error)]
pub enum ScullError {
    // -------------------------------------------------------------------------
    // Device Errors
    // -------------------------------------------------------------------------
    #[error("Invalid device handle: index {index} (registry holds {count} devices)")]
    InvalidHandle { index: usize, count: usize },

    #[error("Interrupted while waiting for the device lock")]
    Interrupted,

    #[error("Device busy: {0}")]
    Busy(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Transfer fault: {0}")]
    TransferFault(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Shell Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScullError {
    /// Whether the caller should simply retry the operation.
    ///
    /// Only an interrupted lock acquisition qualifies; it never changed state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScullError::Interrupted)
    }
}
