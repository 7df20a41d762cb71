use super::*;
use crate::input::StartRequest;

fn at(rfc3339: &str) -> DateTime<Utc> {
    rfc3339.parse().expect("timestamp")
}

fn secs(n: i64) -> TimeDelta {
    TimeDelta::seconds(n)
}

fn started(h: &str, m: &str, s: &str, now: DateTime<Utc>) -> Countdown {
    let mut countdown = Countdown::new();
    countdown.start(&StartRequest::duration(h, m, s), &TimeZoneSetting::Utc, now);
    countdown
}

#[test]
fn duration_start_targets_exact_offset() {
    let now = at("2026-03-01T12:00:00Z");
    for (h, m, s) in [(0u32, 5u32, 0u32), (1, 0, 1), (0, 0, 0), (2, 90, 75), (48, 0, 0)] {
        let countdown = started(&h.to_string(), &m.to_string(), &s.to_string(), now);
        let expected = i64::from(h * 3600 + m * 60 + s);
        assert_eq!(countdown.target(), Some(now + secs(expected)), "{h}:{m}:{s}");
        assert!(countdown.is_running());
    }
}

#[test]
fn invalid_duration_degrades_to_invalid_display() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = Countdown::new();
    let shown = countdown.start(
        &StartRequest::duration("1", "five", "0"),
        &TimeZoneSetting::Utc,
        now,
    );

    assert_eq!(shown, TimerDisplay::Invalid);
    assert_eq!(shown.to_string(), "Invalid time");
    assert!(!countdown.is_running());
    assert_eq!(countdown.tick(now + secs(3)), TimerDisplay::Invalid);
}

#[test]
fn empty_duration_field_is_invalid_but_empty_clock_field_is_zero() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = Countdown::new();
    assert_eq!(
        countdown.start(&StartRequest::duration("", "1", "0"), &TimeZoneSetting::Utc, now),
        TimerDisplay::Invalid
    );

    countdown.start(&StartRequest::clock("13", "", ""), &TimeZoneSetting::Utc, now);
    assert_eq!(countdown.target(), Some(at("2026-03-01T13:00:00Z")));
}

#[test]
fn tick_formats_remaining_time() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "5", "0", now);
    assert_eq!(countdown.tick(now).to_string(), "T-00:05:00");
    assert_eq!(countdown.tick(now + secs(61)).to_string(), "T-00:03:59");
}

#[test]
fn switches_to_count_up_at_zero() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "0", "10", now);

    assert_eq!(countdown.tick(now + secs(10)), TimerDisplay::CountingUp(0));
    assert!(countdown.is_counting_up());
    assert_eq!(countdown.tick(now + secs(75)).to_string(), "T+00:01:05");
}

#[test]
fn hold_shows_elapsed_hold_time() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "10", "0", now);

    assert!(countdown.hold(now + secs(60)));
    assert!(countdown.is_holding());
    assert_eq!(countdown.remaining(), secs(540));
    assert_eq!(countdown.tick(now + secs(185)).to_string(), "H+00:02:05");
}

#[test]
fn hold_then_resume_preserves_remaining_time() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "10", "0", now);

    let hold_at = now + TimeDelta::milliseconds(30_400);
    countdown.hold(hold_at);
    let frozen = countdown.remaining();

    let resume_at = hold_at + TimeDelta::milliseconds(200);
    assert!(countdown.resume(resume_at));
    let after = countdown.target().expect("target") - resume_at;
    assert_eq!(after, frozen);
    assert!((after.num_seconds() - 570).abs() <= 1);
}

#[test]
fn long_hold_shifts_target_by_hold_length() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "1", "0", now);

    countdown.hold(now + secs(20));
    countdown.resume(now + secs(320));
    assert_eq!(countdown.target(), Some(now + secs(360)));
    assert_eq!(countdown.tick(now + secs(330)).to_string(), "T-00:00:30");
}

#[test]
fn hold_and_resume_are_ignored_in_wrong_phase() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = Countdown::new();
    assert!(!countdown.hold(now));
    assert!(!countdown.resume(now));

    let mut countdown = started("0", "1", "0", now);
    assert!(!countdown.resume(now));
    assert!(countdown.hold(now));
    assert!(!countdown.hold(now + secs(1)));
}

#[test]
fn hold_during_count_up_keeps_elapsed_time() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "0", "5", now);
    countdown.tick(now + secs(5));
    countdown.tick(now + secs(25));

    countdown.hold(now + secs(25));
    countdown.resume(now + secs(100));
    assert_eq!(countdown.tick(now + secs(110)).to_string(), "T+00:00:30");
}

#[test]
fn scrub_is_terminal_until_restart() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "5", "0", now);
    countdown.scrub();

    assert!(countdown.is_scrubbed());
    assert!(!countdown.is_running());
    assert!(!countdown.hold(now + secs(1)));
    assert_eq!(countdown.tick(now + secs(400)).to_string(), "SCRUB");

    countdown.start(&StartRequest::duration("0", "0", "30"), &TimeZoneSetting::Utc, now);
    assert!(!countdown.is_scrubbed());
    assert_eq!(countdown.tick(now).to_string(), "T-00:00:30");
}

#[test]
fn reset_returns_to_idle_and_keeps_auto_holds() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = started("0", "5", "0", now);
    countdown.set_auto_holds([30]);
    countdown.hold(now);
    countdown.reset();

    assert_eq!(countdown.phase(), Phase::Idle);
    assert_eq!(countdown.tick(now + secs(10)).to_string(), "T-00:00:00");
    assert_eq!(countdown.auto_holds().collect::<Vec<_>>(), vec![30]);
}

#[test]
fn auto_hold_fires_once_per_run() {
    let now = at("2026-03-01T12:00:00Z");
    let mut countdown = Countdown::new();
    countdown.set_auto_holds([60]);
    countdown.start(&StartRequest::duration("0", "2", "0"), &TimeZoneSetting::Utc, now);

    assert_eq!(countdown.tick(now + secs(59)), TimerDisplay::CountingDown(61));
    assert_eq!(countdown.tick(now + secs(60)), TimerDisplay::Holding(0));
    assert!(countdown.is_holding());

    countdown.resume(now + secs(90));
    assert_eq!(countdown.tick(now + secs(90)), TimerDisplay::CountingDown(60));
    assert!(!countdown.is_holding());

    countdown.start(&StartRequest::duration("0", "1", "0"), &TimeZoneSetting::Utc, now);
    assert_eq!(countdown.tick(now), TimerDisplay::Holding(0));
}
