//! Countdown engine module.
//!
//! - `countdown`: the state machine and remaining-time arithmetic
//! - `error`: input and phase errors returned by the engine

pub mod countdown;
pub mod error;

pub use countdown::CountdownEngine;
pub use error::{CountdownError, InputError, StateError};
