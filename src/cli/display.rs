//! Display utilities for the countdown CLI.
//!
//! This module provides formatted output for:
//! - The running clock and progress bar
//! - Human-readable remaining-time messages
//! - JSON frames for `--json`
//! - Error messages

use chrono::{DateTime, Local, Utc};
use tracing::warn;

use crate::driver::CountdownEvent;
use crate::notify::Completion;
use crate::types::{CountdownPhase, Frame, OutputFormat, RemainingTime};

/// Width of the text progress bar, in cells.
pub const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Formatting
// ============================================================================

/// Formats remaining time as zero-padded `HH:MM:SS`, prefixed by `Nd ` when
/// at least a day is left.
pub fn format_clock(remaining: &RemainingTime) -> String {
    let clock = format!(
        "{:02}:{:02}:{:02}",
        remaining.hours, remaining.minutes, remaining.seconds
    );
    if remaining.days > 0 {
        format!("{}d {}", remaining.days, clock)
    } else {
        clock
    }
}

/// Describes remaining time with its two most significant units.
pub fn describe_remaining(remaining: &RemainingTime) -> String {
    let RemainingTime {
        days,
        hours,
        minutes,
        seconds,
        ..
    } = *remaining;

    if days > 0 {
        format!("{} and {} remaining", unit(days, "day"), unit(hours, "hour"))
    } else if hours > 0 {
        format!(
            "{} and {} remaining",
            unit(hours, "hour"),
            unit(minutes, "minute")
        )
    } else if minutes > 0 {
        format!(
            "{} and {} remaining",
            unit(minutes, "minute"),
            unit(seconds, "second")
        )
    } else {
        format!("{} remaining", unit(seconds, "second"))
    }
}

fn unit(value: u64, name: &str) -> String {
    if value == 1 {
        format!("{value} {name}")
    } else {
        format!("{value} {name}s")
    }
}

/// Formats remaining time compactly, dropping seconds once days are shown.
pub fn format_compact(remaining: &RemainingTime) -> String {
    if remaining.days > 0 {
        format!(
            "{}d {}h {}m",
            remaining.days, remaining.hours, remaining.minutes
        )
    } else if remaining.hours > 0 {
        format!(
            "{}h {}m {}s",
            remaining.hours, remaining.minutes, remaining.seconds
        )
    } else if remaining.minutes > 0 {
        format!("{}m {}s", remaining.minutes, remaining.seconds)
    } else {
        format!("{}s", remaining.seconds)
    }
}

/// Renders a progress bar like `[#####-----]  50%`.
///
/// `fraction` is clamped to `[0, 1]`.
pub fn render_progress(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let percent = (fraction * 100.0).round() as u32;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

/// Formats an instant in the local time zone.
pub fn format_local(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

// ============================================================================
// Display
// ============================================================================

/// Renders driver events for the terminal.
#[derive(Debug, Clone)]
pub struct Display {
    format: OutputFormat,
    label: Option<String>,
    /// Progress of the last tick, reused for frames that carry none
    progress: f64,
}

impl Display {
    pub fn new(format: OutputFormat, label: Option<String>) -> Self {
        Self {
            format,
            label,
            progress: 0.0,
        }
    }

    /// Prints the rendering of `event`, if any.
    ///
    /// Refused commands go to stderr so the JSON stream stays clean.
    pub fn show(&mut self, event: &CountdownEvent) {
        if let CountdownEvent::Rejected { reason } = event {
            eprintln!("ignored: {reason}");
            return;
        }
        if let Some(line) = self.render(event) {
            println!("{line}");
        }
    }

    /// Renders `event` as one line of output.
    pub fn render(&mut self, event: &CountdownEvent) -> Option<String> {
        match self.format {
            OutputFormat::Text => self.render_text(event),
            OutputFormat::Json => self.to_frame(event).and_then(|frame| frame_to_json(&frame)),
        }
    }

    fn render_text(&mut self, event: &CountdownEvent) -> Option<String> {
        let line = match event {
            CountdownEvent::Started { remaining, target } => {
                self.progress = 0.0;
                format!(
                    "{}Counting down {} to {}",
                    self.prefix(),
                    format_compact(remaining),
                    format_local(*target)
                )
            }
            CountdownEvent::Tick {
                remaining,
                progress,
            } => {
                self.progress = *progress;
                format!(
                    "{}{}  {}  {}",
                    self.prefix(),
                    format_clock(remaining),
                    render_progress(*progress, PROGRESS_WIDTH),
                    describe_remaining(remaining)
                )
            }
            CountdownEvent::Paused { remaining } => {
                format!("{}Paused, {} left", self.prefix(), format_compact(remaining))
            }
            CountdownEvent::Resumed { remaining } => {
                format!("{}Resumed, {} left", self.prefix(), format_compact(remaining))
            }
            CountdownEvent::Reset => {
                self.progress = 0.0;
                format!("{}Reset", self.prefix())
            }
            CountdownEvent::Expired { target } => {
                self.progress = 1.0;
                Completion::new(self.label.clone(), *target).message()
            }
            CountdownEvent::Rejected { .. } => return None,
        };
        Some(line)
    }

    /// Maps an event to the frame shown in JSON mode.
    pub fn to_frame(&mut self, event: &CountdownEvent) -> Option<Frame> {
        let (phase, remaining) = match event {
            CountdownEvent::Started { remaining, .. } => {
                self.progress = 0.0;
                (CountdownPhase::Running, *remaining)
            }
            CountdownEvent::Tick {
                remaining,
                progress,
            } => {
                self.progress = *progress;
                (CountdownPhase::Running, *remaining)
            }
            CountdownEvent::Paused { remaining } => (CountdownPhase::Paused, *remaining),
            CountdownEvent::Resumed { remaining } => (CountdownPhase::Running, *remaining),
            CountdownEvent::Reset => {
                self.progress = 0.0;
                (CountdownPhase::Idle, RemainingTime::ZERO)
            }
            CountdownEvent::Expired { .. } => {
                self.progress = 1.0;
                (CountdownPhase::Expired, RemainingTime::ZERO)
            }
            CountdownEvent::Rejected { .. } => return None,
        };
        Some(Frame::new(phase, self.label.clone(), remaining, self.progress))
    }

    fn prefix(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}  "),
            None => String::new(),
        }
    }

    /// Renders an idle preview of `remaining`.
    pub fn render_preview(
        format: OutputFormat,
        remaining: &RemainingTime,
        target: Option<DateTime<Utc>>,
    ) -> Option<String> {
        match format {
            OutputFormat::Json => frame_to_json(&Frame::new(
                CountdownPhase::Idle,
                None,
                *remaining,
                0.0,
            )),
            OutputFormat::Text => {
                let mut text = format!(
                    "{}  {}",
                    format_clock(remaining),
                    describe_remaining(remaining)
                );
                if let Some(target) = target {
                    text.push_str(&format!("\nTarget: {}", format_local(target)));
                }
                Some(text)
            }
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

fn frame_to_json(frame: &Frame) -> Option<String> {
    match serde_json::to_string(frame) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "failed to serialize frame");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn remaining(days: u64, hours: u64, minutes: u64, seconds: u64) -> RemainingTime {
        RemainingTime::from_seconds(days * 86400 + hours * 3600 + minutes * 60 + seconds)
    }

    // ------------------------------------------------------------------------
    // Format Tests
    // ------------------------------------------------------------------------

    mod format_clock_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_clock(&RemainingTime::ZERO), "00:00:00");
        }

        #[test]
        fn test_under_a_day() {
            assert_eq!(format_clock(&remaining(0, 1, 2, 3)), "01:02:03");
            assert_eq!(format_clock(&remaining(0, 23, 59, 59)), "23:59:59");
        }

        #[test]
        fn test_with_days() {
            assert_eq!(format_clock(&remaining(1, 1, 1, 1)), "1d 01:01:01");
            assert_eq!(format_clock(&remaining(365, 0, 0, 0)), "365d 00:00:00");
        }
    }

    mod describe_tests {
        use super::*;

        #[test]
        fn test_days_and_hours() {
            assert_eq!(
                describe_remaining(&remaining(1, 1, 1, 1)),
                "1 day and 1 hour remaining"
            );
            assert_eq!(
                describe_remaining(&remaining(3, 0, 5, 0)),
                "3 days and 0 hours remaining"
            );
        }

        #[test]
        fn test_hours_and_minutes() {
            assert_eq!(
                describe_remaining(&remaining(0, 2, 1, 59)),
                "2 hours and 1 minute remaining"
            );
        }

        #[test]
        fn test_minutes_and_seconds() {
            assert_eq!(
                describe_remaining(&remaining(0, 0, 5, 1)),
                "5 minutes and 1 second remaining"
            );
        }

        #[test]
        fn test_seconds_only() {
            assert_eq!(describe_remaining(&remaining(0, 0, 0, 1)), "1 second remaining");
            assert_eq!(describe_remaining(&RemainingTime::ZERO), "0 seconds remaining");
        }
    }

    mod compact_tests {
        use super::*;

        #[test]
        fn test_compact_forms() {
            assert_eq!(format_compact(&remaining(1, 1, 1, 1)), "1d 1h 1m");
            assert_eq!(format_compact(&remaining(0, 1, 1, 1)), "1h 1m 1s");
            assert_eq!(format_compact(&remaining(0, 0, 1, 1)), "1m 1s");
            assert_eq!(format_compact(&remaining(0, 0, 0, 1)), "1s");
            assert_eq!(format_compact(&RemainingTime::ZERO), "0s");
        }
    }

    mod progress_tests {
        use super::*;

        #[test]
        fn test_half() {
            assert_eq!(render_progress(0.5, 10), "[#####-----]  50%");
        }

        #[test]
        fn test_bounds() {
            assert_eq!(render_progress(0.0, 4), "[----]   0%");
            assert_eq!(render_progress(1.0, 4), "[####] 100%");
        }

        #[test]
        fn test_out_of_range_is_clamped() {
            assert_eq!(render_progress(-1.0, 4), "[----]   0%");
            assert_eq!(render_progress(3.0, 4), "[####] 100%");
            assert_eq!(render_progress(f64::NAN, 4), "[----]   0%");
        }
    }

    // ------------------------------------------------------------------------
    // Display Tests
    // ------------------------------------------------------------------------

    mod display_tests {
        use super::*;

        fn target() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap()
        }

        #[test]
        fn test_text_tick_line() {
            let mut display = Display::new(OutputFormat::Text, Some("Tea".to_string()));
            let line = display
                .render(&CountdownEvent::Tick {
                    remaining: remaining(0, 0, 1, 30),
                    progress: 0.25,
                })
                .unwrap();

            assert!(line.starts_with("Tea  00:01:30"));
            assert!(line.contains(" 25%"));
            assert!(line.ends_with("1 minute and 30 seconds remaining"));
        }

        #[test]
        fn test_text_completion_message() {
            let mut display = Display::new(OutputFormat::Text, Some("Tea".to_string()));
            let line = display
                .render(&CountdownEvent::Expired { target: target() })
                .unwrap();
            assert_eq!(line, "Tea: Time's up!");

            let mut display = Display::new(OutputFormat::Text, None);
            let line = display
                .render(&CountdownEvent::Expired { target: target() })
                .unwrap();
            assert_eq!(line, "Time's up!");
        }

        #[test]
        fn test_text_pause_and_reset() {
            let mut display = Display::new(OutputFormat::Text, None);
            assert_eq!(
                display.render(&CountdownEvent::Paused {
                    remaining: remaining(0, 0, 0, 42)
                }),
                Some("Paused, 42s left".to_string())
            );
            assert_eq!(
                display.render(&CountdownEvent::Reset),
                Some("Reset".to_string())
            );
        }

        #[test]
        fn test_rejected_not_rendered() {
            let mut display = Display::new(OutputFormat::Json, None);
            let event = CountdownEvent::Rejected {
                reason: "no".to_string(),
            };
            assert_eq!(display.render(&event), None);
        }

        #[test]
        fn test_json_frames_track_progress() {
            let mut display = Display::new(OutputFormat::Json, Some("Tea".to_string()));
            display.render(&CountdownEvent::Tick {
                remaining: remaining(0, 0, 0, 3),
                progress: 0.4,
            });

            let frame = display
                .to_frame(&CountdownEvent::Paused {
                    remaining: remaining(0, 0, 0, 3),
                })
                .unwrap();
            assert_eq!(frame.phase, CountdownPhase::Paused);
            assert!((frame.progress - 0.4).abs() < 1e-9);

            let json = display
                .render(&CountdownEvent::Expired { target: target() })
                .unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["phase"], "expired");
            assert_eq!(value["label"], "Tea");
            assert_eq!(value["remaining"]["totalSeconds"], 0);
            assert_eq!(value["progress"], 1.0);
        }

        #[test]
        fn test_preview_text_and_json() {
            let text =
                Display::render_preview(OutputFormat::Text, &remaining(1, 1, 1, 1), None).unwrap();
            assert_eq!(text, "1d 01:01:01  1 day and 1 hour remaining");

            let json =
                Display::render_preview(OutputFormat::Json, &remaining(0, 0, 2, 0), None).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["phase"], "idle");
            assert_eq!(value["remaining"]["minutes"], 2);
            assert!(value.get("label").is_none());
        }
    }
}
