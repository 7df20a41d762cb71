use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

use crate::{display::TimerDisplay, input::StartRequest, timezone::TimeZoneSetting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Holding,
    Scrubbed,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    phase: Phase,
    target: Option<DateTime<Utc>>,
    /// Signed time to target frozen at the last hold. Negative once the
    /// countdown has passed T-0.
    remaining: TimeDelta,
    hold_started: Option<DateTime<Utc>>,
    counting_up: bool,
    auto_holds: BTreeSet<i64>,
    auto_holds_fired: HashSet<i64>,
    display: TimerDisplay,
}

impl Default for Countdown {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            remaining: TimeDelta::zero(),
            hold_started: None,
            counting_up: false,
            auto_holds: BTreeSet::new(),
            auto_holds_fired: HashSet::new(),
            display: TimerDisplay::Idle,
        }
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds-before-T marks at which a running countdown holds on its own.
    pub fn set_auto_holds(&mut self, seconds: impl IntoIterator<Item = u32>) {
        self.auto_holds = seconds.into_iter().map(i64::from).collect();
    }

    pub fn auto_holds(&self) -> impl Iterator<Item = i64> + '_ {
        self.auto_holds.iter().copied()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True from a successful start until scrub or reset, including holds.
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Holding)
    }

    pub fn is_holding(&self) -> bool {
        self.phase == Phase::Holding
    }

    pub fn is_scrubbed(&self) -> bool {
        self.phase == Phase::Scrubbed
    }

    pub fn is_counting_up(&self) -> bool {
        self.counting_up
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    pub fn remaining(&self) -> TimeDelta {
        self.remaining
    }

    pub fn display(&self) -> TimerDisplay {
        self.display
    }

    pub fn start(
        &mut self,
        request: &StartRequest,
        tz: &TimeZoneSetting,
        now: DateTime<Utc>,
    ) -> TimerDisplay {
        self.auto_holds_fired.clear();
        self.hold_started = None;
        self.counting_up = false;

        match request.resolve_target(tz, now) {
            Ok(target) => {
                self.phase = Phase::Running;
                self.target = Some(target);
                self.remaining = target - now;
                self.display = TimerDisplay::CountingDown(self.remaining.num_seconds());
                info!(
                    mode = ?request.mode,
                    %target,
                    remaining_secs = self.remaining.num_seconds(),
                    "countdown started"
                );
            }
            Err(err) => {
                self.phase = Phase::Idle;
                self.target = None;
                self.remaining = TimeDelta::zero();
                self.display = TimerDisplay::Invalid;
                warn!(error = %err, "rejected countdown input");
            }
        }

        self.display
    }

    /// Freezes the countdown. Returns false when there is nothing to hold.
    pub fn hold(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };

        let mut remaining = target - now;
        if !self.counting_up {
            remaining = remaining.max(TimeDelta::zero());
        }

        self.phase = Phase::Holding;
        self.remaining = remaining;
        self.hold_started = Some(now);
        self.display = TimerDisplay::Holding(0);
        info!(remaining_secs = remaining.num_seconds(), "countdown on hold");
        true
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Holding {
            return false;
        }

        let target = now + self.remaining;
        self.phase = Phase::Running;
        self.target = Some(target);
        self.hold_started = None;
        self.display = if self.counting_up {
            TimerDisplay::CountingUp((now - target).num_seconds())
        } else {
            TimerDisplay::CountingDown(self.remaining.num_seconds())
        };
        info!(%target, "countdown resumed");
        true
    }

    /// Terminal until the next start or reset.
    pub fn scrub(&mut self) {
        self.phase = Phase::Scrubbed;
        self.hold_started = None;
        self.display = TimerDisplay::Scrubbed;
        info!("countdown scrubbed");
    }

    pub fn reset(&mut self) {
        let auto_holds = std::mem::take(&mut self.auto_holds);
        *self = Self {
            auto_holds,
            ..Self::default()
        };
    }

    /// Advances the display to `now`. Idle and scrubbed machines keep
    /// whatever they last showed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TimerDisplay {
        match self.phase {
            Phase::Running => self.tick_running(now),
            Phase::Holding => {
                let since = self.hold_started.unwrap_or(now);
                self.display = TimerDisplay::Holding((now - since).num_seconds());
            }
            Phase::Idle | Phase::Scrubbed => {}
        }

        self.display
    }

    fn tick_running(&mut self, now: DateTime<Utc>) {
        let Some(target) = self.target else {
            self.display = TimerDisplay::Idle;
            return;
        };

        if self.counting_up {
            self.display = TimerDisplay::CountingUp((now - target).num_seconds());
            return;
        }

        let diff = (target - now).num_seconds();
        if self.auto_holds.contains(&diff) && self.auto_holds_fired.insert(diff) {
            info!(remaining_secs = diff, "auto-hold reached");
            self.hold(now);
            return;
        }

        if diff <= 0 {
            self.counting_up = true;
            self.target = Some(now);
            self.remaining = TimeDelta::zero();
            self.display = TimerDisplay::CountingUp(0);
            info!("T-0 reached; counting up");
        } else {
            self.display = TimerDisplay::CountingDown(diff);
        }
    }
}

#[cfg(test)]
#[path = "tests/machine_tests.rs"]
mod tests;
