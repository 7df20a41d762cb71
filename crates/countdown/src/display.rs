use std::fmt;

pub const IDLE_TEXT: &str = "T-00:00:00";
pub const SCRUB_TEXT: &str = "SCRUB";
pub const INVALID_TEXT: &str = "Invalid time";

/// What the countdown overlay should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerDisplay {
    #[default]
    Idle,
    Invalid,
    Scrubbed,
    CountingDown(i64),
    CountingUp(i64),
    Holding(i64),
}

impl fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Idle => f.write_str(IDLE_TEXT),
            Self::Invalid => f.write_str(INVALID_TEXT),
            Self::Scrubbed => f.write_str(SCRUB_TEXT),
            Self::CountingDown(secs) => f.write_str(&format_clock("T-", secs)),
            Self::CountingUp(secs) => f.write_str(&format_clock("T+", secs)),
            Self::Holding(secs) => f.write_str(&format_clock("H+", secs)),
        }
    }
}

/// Formats whole seconds as `<prefix>HH:MM:SS`. Hours are not wrapped, so a
/// 100 hour countdown renders as `T-100:00:00`.
pub fn format_clock(prefix: &str, seconds: i64) -> String {
    let seconds = seconds.max(0);
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{prefix}{h:02}:{m:02}:{s:02}")
}
