//! Countdown engine error types.
//!
//! Every error is reported synchronously to the caller; the engine never
//! retries and never changes state when it returns one of these.

use thiserror::Error;

/// Rejected countdown input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    /// A duration countdown needs at least one second.
    #[error("please set a duration longer than zero seconds")]
    NotPositive,

    /// A target countdown needs a target after the current time.
    #[error("please select a future date and time")]
    NotFuture,

    /// The duration ends beyond the last representable date.
    #[error("please set a shorter duration")]
    TooLong,
}

/// An operation invoked from a phase that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// `pause` requires a running countdown.
    #[error("the countdown is not running")]
    NotRunning,

    /// `resume` requires a paused countdown.
    #[error("the countdown is not paused")]
    NotPaused,

    /// `start` requires an idle or expired countdown.
    #[error("a countdown is already in progress")]
    AlreadyActive,
}

/// Any error returned by the countdown engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    State(#[from] StateError),
}
