use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use shared::error::StatusFailure;
use thiserror::Error;

use crate::timezone::TimeZoneSetting;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} is not a whole number: '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
    #[error("countdown length does not fit on the calendar")]
    Overflow,
    #[error("{0} does not exist in the configured timezone")]
    NonexistentLocalTime(NaiveTime),
}

impl From<InputError> for StatusFailure {
    fn from(value: InputError) -> Self {
        StatusFailure::invalid_input(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Count down a fixed H/M/S length from now.
    Duration,
    /// Count down to the next occurrence of a wall-clock time.
    Clock,
}

/// Raw operator input for `Countdown::start`. Fields stay as text so that
/// parsing failures surface as an invalid display instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub mode: StartMode,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl StartRequest {
    pub fn duration(
        hours: impl Into<String>,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self {
            mode: StartMode::Duration,
            hours: hours.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    pub fn clock(
        hours: impl Into<String>,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self {
            mode: StartMode::Clock,
            hours: hours.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    /// Absolute launch time for this request relative to `now`.
    pub fn resolve_target(
        &self,
        tz: &TimeZoneSetting,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, InputError> {
        match self.mode {
            StartMode::Duration => {
                let h = parse_field("hours", &self.hours, true)?;
                let m = parse_field("minutes", &self.minutes, true)?;
                let s = parse_field("seconds", &self.seconds, true)?;
                let total = i64::from(h) * 3600 + i64::from(m) * 60 + i64::from(s);
                let delta = TimeDelta::try_seconds(total).ok_or(InputError::Overflow)?;
                now.checked_add_signed(delta).ok_or(InputError::Overflow)
            }
            StartMode::Clock => {
                let h = parse_field("hours", &self.hours, false)?;
                let m = parse_field("minutes", &self.minutes, false)?;
                let s = parse_field("seconds", &self.seconds, false)?;
                if h > 23 {
                    return Err(InputError::OutOfRange {
                        field: "hours",
                        value: h,
                    });
                }
                if m > 59 {
                    return Err(InputError::OutOfRange {
                        field: "minutes",
                        value: m,
                    });
                }
                if s > 59 {
                    return Err(InputError::OutOfRange {
                        field: "seconds",
                        value: s,
                    });
                }

                let time = NaiveTime::from_hms_opt(h, m, s).ok_or(InputError::Overflow)?;
                tz.next_occurrence(now, time)
                    .ok_or(InputError::NonexistentLocalTime(time))
            }
        }
    }
}

fn parse_field(field: &'static str, raw: &str, required: bool) -> Result<u32, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if required {
            Err(InputError::Missing { field })
        } else {
            Ok(0)
        };
    }

    trimmed.parse::<u32>().map_err(|_| InputError::NotANumber {
        field,
        value: trimmed.to_string(),
    })
}
