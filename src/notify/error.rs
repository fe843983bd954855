//! Completion notifier error types.

use thiserror::Error;

use crate::sound::SoundError;

/// Errors raised by a completion notifier.
///
/// These never propagate into the countdown engine; the composite notifier
/// logs and drops them.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Sound playback failed.
    #[error(transparent)]
    Sound(#[from] SoundError),

    /// Writing to the terminal failed.
    #[error("failed to write to the terminal: {0}")]
    Io(#[from] std::io::Error),

    /// The notifier cannot run in this environment.
    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}
