//! Timer driver.
//!
//! The driver owns the [`CountdownEngine`](crate::engine::CountdownEngine)
//! and the one-second ticker. Commands come in as [`Control`] messages,
//! state changes go out as [`CountdownEvent`]s, and the completion notifier
//! fires once when the countdown expires.

mod clock;
mod runner;

use chrono::{DateTime, Utc};

pub use clock::{Clock, ManualClock, SystemClock};
pub use runner::CountdownDriver;

use crate::types::{CountdownSpec, RemainingTime};

/// Commands accepted by the driver between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Start a new countdown
    Start(CountdownSpec),
    Pause,
    Resume,
    Reset,
    /// Stop the driver without waiting for expiry
    Quit,
}

/// Events emitted by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownEvent {
    /// A countdown was started
    Started {
        remaining: RemainingTime,
        target: DateTime<Utc>,
    },
    /// One second elapsed while running
    Tick {
        remaining: RemainingTime,
        /// Elapsed fraction in `[0, 1]`
        progress: f64,
    },
    Paused {
        remaining: RemainingTime,
    },
    Resumed {
        remaining: RemainingTime,
    },
    Reset,
    /// The countdown reached zero
    Expired { target: DateTime<Utc> },
    /// A command the engine refused
    Rejected { reason: String },
}

/// How [`CountdownDriver::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Expired,
    Cancelled,
}
