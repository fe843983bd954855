//! Input provider for the countdown timer.
//!
//! Turns what the user typed into a [`CountdownSpec`](crate::types::CountdownSpec):
//! - `duration`: unit fields with range checks and duration strings
//! - `target`: target date-time strings in the local time zone
//!
//! Only presentation-level checks happen here. Whether a duration is
//! positive or a target lies in the future is decided by the engine.

pub mod duration;
pub mod error;
pub mod target;

pub use duration::{
    parse_duration, DurationFields, MAX_DAYS, MAX_HOURS, MAX_MINUTES, MAX_SECONDS,
};
pub use error::ParseError;
pub use target::{parse_target, parse_target_in};
