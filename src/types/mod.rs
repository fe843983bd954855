//! Core data types for the countdown timer.
//!
//! This module defines the data structures used for:
//! - Describing what is counted down to (`CountdownSpec`)
//! - The state machine phase (`CountdownPhase`)
//! - Remaining-time arithmetic (`RemainingTime`, `TickResult`)
//! - Run configuration with validation (`CountdownConfig`)
//! - Serialized display frames for JSON output

use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Longest label accepted in the configuration.
pub const MAX_LABEL_LEN: usize = 100;

// ============================================================================
// CountdownMode / CountdownSpec
// ============================================================================

/// How the end of a countdown is specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CountdownMode {
    /// Count down a fixed number of seconds from the moment of start.
    Duration {
        /// Total seconds to count down from
        seconds: u64,
    },
    /// Count down to a fixed wall-clock instant.
    AbsoluteTarget {
        /// The instant the countdown reaches zero
        target: DateTime<Utc>,
    },
}

/// Immutable definition of what is being counted down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSpec {
    /// Duration or absolute target
    #[serde(flatten)]
    pub mode: CountdownMode,
}

impl CountdownSpec {
    /// Creates a duration-mode spec.
    pub fn duration(seconds: u64) -> Self {
        Self {
            mode: CountdownMode::Duration { seconds },
        }
    }

    /// Creates an absolute-target spec.
    pub fn until(target: DateTime<Utc>) -> Self {
        Self {
            mode: CountdownMode::AbsoluteTarget { target },
        }
    }

    /// Returns the duration in seconds for duration-mode specs.
    pub fn duration_seconds(&self) -> Option<u64> {
        match self.mode {
            CountdownMode::Duration { seconds } => Some(seconds),
            CountdownMode::AbsoluteTarget { .. } => None,
        }
    }

    /// Returns the target instant for absolute-target specs.
    pub fn target_instant(&self) -> Option<DateTime<Utc>> {
        match self.mode {
            CountdownMode::Duration { .. } => None,
            CountdownMode::AbsoluteTarget { target } => Some(target),
        }
    }

    /// Resolves the instant of expiry for a countdown started at `now`.
    ///
    /// Returns `None` for a duration that ends after the last representable
    /// instant.
    pub fn resolve_target(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.mode {
            CountdownMode::Duration { seconds } => checked_add_seconds(now, seconds),
            CountdownMode::AbsoluteTarget { target } => Some(target),
        }
    }
}

fn checked_add_seconds(instant: DateTime<Utc>, seconds: u64) -> Option<DateTime<Utc>> {
    i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| instant.checked_add_signed(delta))
}

/// Adds whole seconds to an instant, saturating at the end of representable time.
pub(crate) fn add_seconds(instant: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    checked_add_seconds(instant, seconds).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ============================================================================
// CountdownPhase
// ============================================================================

/// Represents the current phase of the countdown state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    /// Nothing has been started, or the countdown was reset
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Frozen at a remaining-time snapshot
    Paused,
    /// Reached zero
    Expired,
}

impl CountdownPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountdownPhase::Idle => "idle",
            CountdownPhase::Running => "running",
            CountdownPhase::Paused => "paused",
            CountdownPhase::Expired => "expired",
        }
    }

    /// Returns true if `start` is accepted from this phase.
    pub fn can_start(&self) -> bool {
        matches!(self, CountdownPhase::Idle | CountdownPhase::Expired)
    }
}

impl std::fmt::Display for CountdownPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RemainingTime
// ============================================================================

/// Remaining time split into calendar-free units.
///
/// The fields always reconstruct `total_seconds`:
/// `days * 86400 + hours * 3600 + minutes * 60 + seconds == total_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Whole seconds remaining
    #[serde(rename = "totalSeconds")]
    pub total_seconds: u64,
}

impl RemainingTime {
    /// Nothing left.
    pub const ZERO: RemainingTime = RemainingTime {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_seconds: 0,
    };

    /// Splits a millisecond difference into units, largest first.
    ///
    /// Negative differences clamp to zero; sub-second remainders truncate.
    pub fn from_millis(millis: i64) -> Self {
        let Ok(ms) = u64::try_from(millis) else {
            return Self::ZERO;
        };

        Self {
            days: ms / MILLIS_PER_DAY,
            hours: (ms % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
            minutes: (ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
            seconds: (ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
            total_seconds: ms / MILLIS_PER_SECOND,
        }
    }

    /// Splits whole seconds into units.
    pub fn from_seconds(seconds: u64) -> Self {
        let millis = seconds.saturating_mul(MILLIS_PER_SECOND);
        Self::from_millis(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Time left from `now` until `target`, clamped at zero.
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis((target - now).num_milliseconds())
    }

    /// Returns true if no whole second remains.
    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }
}

// ============================================================================
// TickResult
// ============================================================================

/// Outcome of one periodic evaluation of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Still counting; carries the remaining time
    Remaining(RemainingTime),
    /// The countdown has reached zero
    Expired,
}

impl TickResult {
    /// Returns true for `TickResult::Expired`.
    pub fn is_expired(&self) -> bool {
        matches!(self, TickResult::Expired)
    }

    /// Remaining time, zero once expired.
    pub fn remaining(&self) -> RemainingTime {
        match self {
            TickResult::Remaining(remaining) => *remaining,
            TickResult::Expired => RemainingTime::ZERO,
        }
    }
}

// ============================================================================
// CountdownConfig
// ============================================================================

/// How the display sink renders frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable single line, redrawn on each tick
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Run configuration for the countdown binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Event name shown next to the clock
    pub label: Option<String>,
    /// Whether to play a sound on completion
    pub sound: bool,
    /// Custom sound file played instead of the synthesized beep
    pub sound_file: Option<PathBuf>,
    /// Whether to ring the terminal bell on completion
    pub bell: bool,
    /// Display format
    pub output: OutputFormat,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            label: None,
            sound: true,
            sound_file: None,
            bell: true,
            output: OutputFormat::Text,
        }
    }
}

impl CountdownConfig {
    /// Sets the event label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets a custom completion sound file.
    pub fn with_sound_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_file = Some(path.into());
        self
    }

    /// Disables the completion sound.
    pub fn without_sound(mut self) -> Self {
        self.sound = false;
        self
    }

    /// Disables the terminal bell.
    pub fn without_bell(mut self) -> Self {
        self.bell = false;
        self
    }

    /// Sets the output format.
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err("label must not be empty".to_string());
            }
            if label.chars().count() > MAX_LABEL_LEN {
                return Err(format!("label must be at most {MAX_LABEL_LEN} characters"));
            }
        }
        if self.sound_file.is_some() && !self.sound {
            return Err("--sound-file cannot be combined with --no-sound".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Frame
// ============================================================================

/// One rendered state of the countdown, as emitted in JSON mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Phase at the time of the frame
    pub phase: CountdownPhase,
    /// Event label (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Remaining time
    pub remaining: RemainingTime,
    /// Elapsed fraction in `[0, 1]`
    pub progress: f64,
}

impl Frame {
    /// Creates a frame.
    pub fn new(
        phase: CountdownPhase,
        label: Option<String>,
        remaining: RemainingTime,
        progress: f64,
    ) -> Self {
        Self {
            phase,
            label,
            remaining,
            progress,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
