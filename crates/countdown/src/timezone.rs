use chrono::{DateTime, FixedOffset, Local, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Zone used to interpret wall-clock launch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
    /// IANA zone such as `US/Eastern`; follows daylight saving changes.
    Named(Tz),
}

impl TimeZoneSetting {
    /// Accepts `local`, `UTC`/`GMT`, numeric offsets such as `UTC+05:30`,
    /// `+0530` or `-4`, and IANA names. Anything else falls back to local
    /// time.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Self::Local;
        }

        let upper = trimmed.to_ascii_uppercase();
        if upper == "UTC" || upper == "GMT" || upper == "Z" {
            return Self::Utc;
        }

        let offset_text = upper
            .strip_prefix("UTC")
            .or_else(|| upper.strip_prefix("GMT"))
            .unwrap_or(&upper);
        if let Some(offset) = parse_offset(offset_text) {
            return Self::Fixed(offset);
        }
        if let Ok(zone) = trimmed.parse::<Tz>() {
            return Self::Named(zone);
        }

        warn!(timezone = %trimmed, "unsupported timezone; using local time");
        Self::Local
    }

    /// The next instant strictly after `now` whose wall-clock time in this
    /// zone equals `time`. Returns `None` when that wall time does not exist
    /// on either candidate day.
    pub fn next_occurrence(&self, now: DateTime<Utc>, time: NaiveTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => next_occurrence_in(&Local, now, time),
            Self::Utc => next_occurrence_in(&Utc, now, time),
            Self::Fixed(offset) => next_occurrence_in(offset, now, time),
            Self::Named(zone) => next_occurrence_in(zone, now, time),
        }
    }
}

fn next_occurrence_in<Z: TimeZone>(
    tz: &Z,
    now: DateTime<Utc>,
    time: NaiveTime,
) -> Option<DateTime<Utc>> {
    let local_now = now.with_timezone(tz);
    let today = local_now.date_naive();

    let candidate = tz.from_local_datetime(&today.and_time(time)).earliest();
    let target = match candidate {
        Some(candidate) if candidate > local_now => candidate,
        _ => {
            let tomorrow = today.succ_opt()?;
            tz.from_local_datetime(&tomorrow.and_time(time)).earliest()?
        }
    };

    Some(target.with_timezone(&Utc))
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.chars().next()? {
        '+' => (1, &raw[1..]),
        '-' => (-1, &raw[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes): (i32, i32) = match digits.len() {
        1 | 2 => (digits.parse().ok()?, 0),
        3 => (digits[..1].parse().ok()?, digits[1..].parse().ok()?),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
#[path = "tests/timezone_tests.rs"]
mod tests;
