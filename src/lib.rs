//! Countdown Timer Library
//!
//! This library provides the core functionality for the countdown CLI.
//! It includes:
//! - Countdown engine (state machine and remaining-time arithmetic)
//! - Input parsing for durations and target date-times
//! - Timer driver running the engine on a one-second ticker
//! - Completion notifiers (terminal bell, sound)
//! - Sound playback for the completion sound
//! - CLI command parsing and display utilities
//! - Type definitions for specs, remaining time and configuration

pub mod cli;
pub mod driver;
pub mod engine;
pub mod input;
pub mod notify;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    CountdownConfig, CountdownMode, CountdownPhase, CountdownSpec, Frame, OutputFormat,
    RemainingTime, TickResult,
};

// Re-export engine types
pub use engine::{CountdownEngine, CountdownError, InputError, StateError};

// Re-export input types
pub use input::{parse_duration, parse_target, DurationFields, ParseError};

// Re-export driver types
pub use driver::{
    Clock, Control, CountdownDriver, CountdownEvent, ManualClock, RunOutcome, SystemClock,
};

// Re-export notifier types
pub use notify::{
    BellNotifier, Completion, CompletionNotifier, CompositeNotifier, MockNotifier, NotifyError,
    SoundNotifier,
};

// Re-export sound types
pub use sound::{
    try_create_player, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource,
};
