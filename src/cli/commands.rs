//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::input::{
    parse_duration, parse_target, DurationFields, ParseError, MAX_DAYS, MAX_HOURS, MAX_MINUTES,
    MAX_SECONDS,
};
use crate::types::{CountdownConfig, CountdownSpec, OutputFormat, MAX_LABEL_LEN};

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "Count down a duration or to a date and time",
    long_about = "Counts down a duration or to a date and time, then rings the bell and plays a sound.\n\
                  While running, type p to pause, r to resume, s to start again, x to reset \
                  and q to quit (each followed by Enter).",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Count down a duration
    Start(StartArgs),

    /// Count down to a date and time
    Until(UntilArgs),

    /// Show what a countdown would look like without starting it
    Preview(PreviewArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Duration as seconds (90), clock (1:30, 1:00:00) or units (1h30m, 2d 4h)
    #[arg(conflicts_with_all = ["days", "hours", "minutes", "seconds"])]
    pub duration: Option<String>,

    /// Days (0-365)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u64).range(0..=MAX_DAYS)
    )]
    pub days: u64,

    /// Hours (0-23)
    #[arg(
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u64).range(0..=MAX_HOURS)
    )]
    pub hours: u64,

    /// Minutes (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u64).range(0..=MAX_MINUTES)
    )]
    pub minutes: u64,

    /// Seconds (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u64).range(0..=MAX_SECONDS)
    )]
    pub seconds: u64,

    #[command(flatten)]
    pub run: RunArgs,
}

impl StartArgs {
    /// Builds the countdown spec from the positional duration or the fields.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the duration text is invalid.
    pub fn to_spec(&self) -> Result<CountdownSpec, ParseError> {
        match &self.duration {
            Some(text) => Ok(CountdownSpec::duration(parse_duration(text)?)),
            None => DurationFields::new(self.days, self.hours, self.minutes, self.seconds).to_spec(),
        }
    }
}

// ============================================================================
// Until Command Arguments
// ============================================================================

/// Arguments for the until command
#[derive(Args, Debug, Clone)]
pub struct UntilArgs {
    /// Target as 2026-12-31T23:59, "2026-12-31 23:59:30", 2026-12-31 or 18:00 (local time)
    pub target: String,

    #[command(flatten)]
    pub run: RunArgs,
}

impl UntilArgs {
    /// Resolves the target against `now`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidTarget` if the text is not a date-time.
    pub fn to_spec(&self, now: DateTime<Utc>) -> Result<CountdownSpec, ParseError> {
        Ok(CountdownSpec::until(parse_target(&self.target, now)?))
    }
}

// ============================================================================
// Preview Command Arguments
// ============================================================================

/// Arguments for the preview command
#[derive(Args, Debug, Clone, Default)]
pub struct PreviewArgs {
    /// Duration to preview
    #[arg(conflicts_with = "until")]
    pub duration: Option<String>,

    /// Date and time to preview instead of a duration
    #[arg(short, long)]
    pub until: Option<String>,

    /// Print the preview as JSON
    #[arg(long)]
    pub json: bool,
}

impl PreviewArgs {
    /// Builds the previewed spec, if any input was given.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is invalid.
    pub fn to_spec(&self, now: DateTime<Utc>) -> Result<Option<CountdownSpec>, ParseError> {
        if let Some(target) = &self.until {
            return Ok(Some(CountdownSpec::until(parse_target(target, now)?)));
        }
        self.duration
            .as_deref()
            .map(|text| parse_duration(text).map(CountdownSpec::duration))
            .transpose()
    }
}

// ============================================================================
// Shared Run Arguments
// ============================================================================

/// Options shared by the commands that run a countdown
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Event name shown next to the clock
    #[arg(short, long, value_parser = validate_label)]
    pub label: Option<String>,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,

    /// Play this file (wav, mp3, flac, ogg) instead of the beep
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound_file: Option<PathBuf>,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub no_bell: bool,

    /// Print one JSON object per event instead of the text display
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Converts the flags into a run configuration.
    pub fn to_config(&self) -> CountdownConfig {
        let mut config = CountdownConfig::default();
        if let Some(label) = &self.label {
            config = config.with_label(label.clone());
        }
        if self.no_sound {
            config = config.without_sound();
        }
        if let Some(path) = &self.sound_file {
            config = config.with_sound_file(path.clone());
        }
        if self.no_bell {
            config = config.without_bell();
        }
        if self.json {
            config = config.with_output(OutputFormat::Json);
        }
        config
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the label.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_label(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("label must not be empty".to_string());
    }
    if s.chars().count() > MAX_LABEL_LEN {
        return Err(format!("label must be at most {MAX_LABEL_LEN} characters"));
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
