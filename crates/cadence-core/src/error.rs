//! Error types for Cadence
//!
//! Errors exist only at construction time: a running command tree has no
//! recoverable-error channel, failures there are expressed purely through
//! timeouts.

use thiserror::Error;

/// Construction-time validation errors
#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("event markers out of time order at index {index}")]
    MarkersOutOfOrder { index: usize },

    #[error("event marker names unregistered command: {0}")]
    UnknownEventCommand(String),

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}

/// Result type for Cadence operations
pub type CadenceResult<T> = Result<T, CadenceError>;
