//! Error types for zync-engine operations.

use thiserror::Error;

use crate::roster::EmployeeId;

#[derive(Error, Debug)]
pub enum ZyncError {
    /// Rejected before any provider call is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by an [`AvailabilityProvider`](crate::provider::AvailabilityProvider)
/// for a single employee and date.
///
/// The engine never propagates these: the employee is treated as unavailable for the
/// whole day and the failure is attached to the result as a
/// [`ProviderWarning`](crate::provider::ProviderWarning).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Unknown employee: {0}")]
    UnknownEmployee(EmployeeId),

    #[error("Invalid working-hour rule: {0}")]
    InvalidRule(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Fetch timed out after {0} ms")]
    TimedOut(u64),
}

pub type Result<T> = std::result::Result<T, ZyncError>;
