//! Countdown state machine.
//!
//! The engine owns the countdown state and nothing else: it never reads the
//! clock and never schedules anything. Every operation takes the current
//! instant as an argument, so callers (and tests) decide what "now" is.
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Paused
//!  ▲                │  ▲               │
//!  │                │  └────resume─────┘
//!  │          tick (≤ 0)
//!  │                ▼
//!  └────reset──── Expired        (reset is accepted from every phase)
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::{CountdownError, InputError, StateError};
use crate::types::{
    add_seconds, CountdownMode, CountdownPhase, CountdownSpec, RemainingTime, TickResult,
};

// ============================================================================
// RunState
// ============================================================================

/// Phase together with the data that is only meaningful in that phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running {
        started_at: DateTime<Utc>,
        target: DateTime<Utc>,
    },
    Paused {
        started_at: DateTime<Utc>,
        remaining_seconds: u64,
    },
    Expired {
        started_at: DateTime<Utc>,
        target: DateTime<Utc>,
    },
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// The countdown state machine and its time arithmetic.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    state: RunState,
    /// Whole-second length of the current countdown, fixed at start
    total_seconds: u64,
    /// Last remaining time handed out, returned by no-op ticks
    last_remaining: RemainingTime,
    /// Input previewed while idle
    draft: Option<CountdownSpec>,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            total_seconds: 0,
            last_remaining: RemainingTime::ZERO,
            draft: None,
        }
    }

    /// Starts counting down to the instant described by `spec`.
    ///
    /// # Errors
    ///
    /// - `StateError::AlreadyActive` if a countdown is running or paused
    /// - `InputError::NotPositive` for a zero duration
    /// - `InputError::NotFuture` for a target at or before `now`
    /// - `InputError::TooLong` for a duration ending past the last
    ///   representable instant
    ///
    /// The engine is left untouched on error.
    pub fn start(&mut self, spec: CountdownSpec, now: DateTime<Utc>) -> Result<(), CountdownError> {
        if !self.phase().can_start() {
            return Err(StateError::AlreadyActive.into());
        }
        validate(&spec, now)?;

        let target = spec.resolve_target(now).ok_or(InputError::TooLong)?;
        let remaining = RemainingTime::between(target, now);

        self.state = RunState::Running {
            started_at: now,
            target,
        };
        self.total_seconds = remaining.total_seconds;
        self.last_remaining = remaining;
        self.draft = None;

        debug!(%target, total_seconds = self.total_seconds, "countdown started");
        Ok(())
    }

    /// Freezes the countdown at its current remaining time.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotRunning` unless the countdown is running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), StateError> {
        let RunState::Running { started_at, target } = self.state else {
            return Err(StateError::NotRunning);
        };

        let remaining = RemainingTime::between(target, now);
        self.state = RunState::Paused {
            started_at,
            remaining_seconds: remaining.total_seconds,
        };
        self.last_remaining = remaining;

        debug!(remaining_seconds = remaining.total_seconds, "countdown paused");
        Ok(())
    }

    /// Continues a paused countdown from its frozen remaining time.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotPaused` unless the countdown is paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), StateError> {
        let RunState::Paused {
            started_at,
            remaining_seconds,
        } = self.state
        else {
            return Err(StateError::NotPaused);
        };

        let target = add_seconds(now, remaining_seconds);
        self.state = RunState::Running { started_at, target };
        self.last_remaining = RemainingTime::from_seconds(remaining_seconds);

        debug!(%target, "countdown resumed");
        Ok(())
    }

    /// Returns to idle from any phase. Calling it twice is harmless.
    pub fn reset(&mut self) {
        if self.state != RunState::Idle {
            debug!(phase = %self.phase(), "countdown reset");
        }
        *self = Self::new();
    }

    /// Evaluates the countdown at `now`.
    ///
    /// Only a running countdown changes here: it expires once `now` reaches
    /// the target. In every other phase this is a no-op that repeats the
    /// last known result.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickResult {
        match self.state {
            RunState::Running { started_at, target } => {
                if target <= now {
                    self.state = RunState::Expired { started_at, target };
                    self.last_remaining = RemainingTime::ZERO;
                    debug!(%target, "countdown expired");
                    TickResult::Expired
                } else {
                    let remaining = RemainingTime::between(target, now);
                    self.last_remaining = remaining;
                    TickResult::Remaining(remaining)
                }
            }
            RunState::Expired { .. } => TickResult::Expired,
            RunState::Idle | RunState::Paused { .. } => TickResult::Remaining(self.last_remaining),
        }
    }

    /// Remaining time at `now` without changing the phase.
    ///
    /// While idle this previews the draft input, if any.
    pub fn snapshot(&self, now: DateTime<Utc>) -> RemainingTime {
        match self.state {
            RunState::Running { target, .. } => RemainingTime::between(target, now),
            RunState::Paused {
                remaining_seconds, ..
            } => RemainingTime::from_seconds(remaining_seconds),
            RunState::Expired { .. } => RemainingTime::ZERO,
            RunState::Idle => match self.draft.map(|spec| spec.mode) {
                Some(CountdownMode::Duration { seconds }) => RemainingTime::from_seconds(seconds),
                Some(CountdownMode::AbsoluteTarget { target }) => {
                    RemainingTime::between(target, now)
                }
                None => RemainingTime::ZERO,
            },
        }
    }

    /// Stores raw input to preview while idle. Ignored in any other phase.
    pub fn preview(&mut self, spec: CountdownSpec) {
        if self.state == RunState::Idle {
            self.draft = Some(spec);
        }
    }

    /// Elapsed fraction of the countdown in `[0, 1]`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        match self.state {
            RunState::Idle => 0.0,
            RunState::Expired { .. } => 1.0,
            RunState::Running { .. } | RunState::Paused { .. } => {
                if self.total_seconds == 0 {
                    return 0.0;
                }
                let remaining = self.snapshot(now).total_seconds as f64;
                (1.0 - remaining / self.total_seconds as f64).clamp(0.0, 1.0)
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CountdownPhase {
        match self.state {
            RunState::Idle => CountdownPhase::Idle,
            RunState::Running { .. } => CountdownPhase::Running,
            RunState::Paused { .. } => CountdownPhase::Paused,
            RunState::Expired { .. } => CountdownPhase::Expired,
        }
    }

    /// Resolved instant of expiry, absent while idle or paused.
    pub fn target(&self) -> Option<DateTime<Utc>> {
        match self.state {
            RunState::Running { target, .. } | RunState::Expired { target, .. } => Some(target),
            RunState::Idle | RunState::Paused { .. } => None,
        }
    }

    /// Instant the current countdown was started, absent while idle.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            RunState::Idle => None,
            RunState::Running { started_at, .. }
            | RunState::Paused { started_at, .. }
            | RunState::Expired { started_at, .. } => Some(started_at),
        }
    }

    /// Whole seconds remaining when paused.
    pub fn paused_remaining_seconds(&self) -> Option<u64> {
        match self.state {
            RunState::Paused {
                remaining_seconds, ..
            } => Some(remaining_seconds),
            _ => None,
        }
    }

    /// Whole-second length of the current countdown as resolved at start.
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }
}

/// Checks the coarse invariants of a spec against `now`.
fn validate(spec: &CountdownSpec, now: DateTime<Utc>) -> Result<(), InputError> {
    match spec.mode {
        CountdownMode::Duration { seconds: 0 } => Err(InputError::NotPositive),
        CountdownMode::Duration { .. } => Ok(()),
        CountdownMode::AbsoluteTarget { target } if target <= now => Err(InputError::NotFuture),
        CountdownMode::AbsoluteTarget { .. } => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
