//! Error taxonomy for the follow-up service
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial taxonomy (validation / not-found / dispatch / scheduler)

/// Failure classes surfaced by the core operations.
///
/// `Validation` and `NotFound` leave no state behind; `Dispatch` implies the
/// affected reminder was marked `failed` and the failure logged. `Scheduler`
/// covers unexpected housekeeping failures inside a polling tick; it is
/// trapped at the tick boundary and never terminates the timer loop.
/// Nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input (caller's fault, no state mutated).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist (no state mutated).
    #[error("not found: {0}")]
    NotFound(String),

    /// The mail transport failed; the reminder was marked `failed`.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// Unexpected failure during a scheduler tick's housekeeping.
    #[error("scheduler error: {0}")]
    Scheduler(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = AppError::validation("email is required");
        assert_eq!(e.to_string(), "validation error: email is required");

        let e = AppError::not_found("client #7");
        assert_eq!(e.to_string(), "not found: client #7");
    }
}
