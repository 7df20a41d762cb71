//! Launch countdown state machine.
//!
//! The machine is driven entirely by the caller's clock: every operation takes
//! `now` explicitly, so the foreground loop decides the tick cadence and tests
//! can step time deterministically.

mod display;
mod input;
mod machine;
mod timezone;

pub use display::{format_clock, TimerDisplay};
pub use input::{InputError, StartMode, StartRequest};
pub use machine::{Countdown, Phase};
pub use timezone::TimeZoneSetting;
