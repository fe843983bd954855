//! Input parsing error types.

use thiserror::Error;

/// Errors raised while turning user input into a countdown spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The duration text could not be understood.
    #[error("invalid duration '{0}' (examples: 90, 1:30, 1h30m, 2d 4h)")]
    InvalidDuration(String),

    /// A duration field is outside its allowed range.
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// The target date-time could not be understood or does not exist.
    #[error("invalid target '{0}' (examples: 2026-12-31T23:59, 2026-12-31 23:59:30, 18:00)")]
    InvalidTarget(String),
}
