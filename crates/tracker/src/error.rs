//! Application-level error model.

use thiserror::Error;

use tracechain_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Deterministic domain failure (validation, not found, conflict).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A writer panicked while holding the state lock.
    #[error("tracker state lock poisoned")]
    Poisoned,
}

impl TrackerError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            TrackerError::Domain(e) => Some(e),
            TrackerError::Poisoned => None,
        }
    }
}

/// Configuration loading failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
