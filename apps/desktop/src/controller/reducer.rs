//! Foreground state: the countdown, persisted settings and the last known
//! board, folded together into the two overlay pages.

use std::time::Duration;

use chrono::{DateTime, Utc};
use countdown::{Countdown, StartRequest, TimeZoneSetting};
use crossbeam_channel::Sender;
use overlay::{OverlayWriter, GONOGO_REFRESH_MS};
use shared::domain::{SourceMode, StatusTriple};
use status_client::{CellMap, SheetSource};
use storage::{Settings, SettingsStore};
use tracing::{info, warn};

use crate::backend_bridge::commands::PollerCommand;
use crate::controller::events::{OperatorCommand, UiEvent, HELP};
use crate::controller::orchestration::dispatch_poller_command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What the Go/No-Go page should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Board {
    Statuses(StatusTriple),
    Embedded(String),
}

pub fn sheet_source_from(settings: &Settings) -> SheetSource {
    SheetSource {
        url: settings.sheet_link.trim().to_string(),
        cells: CellMap {
            range: settings.range_cell.clone(),
            weather: settings.weather_cell.clone(),
            vehicle: settings.vehicle_cell.clone(),
        },
        embed_url: settings.fallback_embed_url.clone(),
    }
}

pub struct Controller {
    countdown: Countdown,
    settings: Settings,
    store: SettingsStore,
    writer: OverlayWriter,
    tz: TimeZoneSetting,
    sheet_statuses: StatusTriple,
    fallback_embed: Option<String>,
    board_dirty: bool,
    last_board_write: Option<DateTime<Utc>>,
    overlay_failing: bool,
    poller_tx: Sender<PollerCommand>,
    status: String,
}

impl Controller {
    pub fn new(
        settings: Settings,
        store: SettingsStore,
        writer: OverlayWriter,
        poller_tx: Sender<PollerCommand>,
    ) -> Self {
        let mut countdown = Countdown::new();
        countdown.set_auto_holds(settings.auto_hold_times.iter().copied());

        Self {
            countdown,
            tz: TimeZoneSetting::parse(&settings.timezone),
            settings,
            store,
            writer,
            sheet_statuses: StatusTriple::unavailable(),
            fallback_embed: None,
            board_dirty: true,
            last_board_write: None,
            overlay_failing: false,
            poller_tx,
            status: String::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn writer(&self) -> &OverlayWriter {
        &self.writer
    }

    /// Feedback for the operator produced by the last command or event.
    pub fn take_status(&mut self) -> Option<String> {
        if self.status.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.status))
        }
    }

    pub fn board(&self) -> Board {
        match self.settings.mode {
            SourceMode::Buttons => Board::Statuses(self.settings.manual_statuses()),
            SourceMode::Spreadsheet => match &self.fallback_embed {
                Some(embed_url) => Board::Embedded(embed_url.clone()),
                None => Board::Statuses(self.sheet_statuses),
            },
        }
    }

    pub fn handle_operator(&mut self, command: OperatorCommand, now: DateTime<Utc>) -> Flow {
        match command {
            OperatorCommand::StartDuration {
                hours,
                minutes,
                seconds,
            } => {
                let request = StartRequest::duration(hours, minutes, seconds);
                self.status = self.countdown.start(&request, &self.tz, now).to_string();
            }
            OperatorCommand::StartClock {
                hours,
                minutes,
                seconds,
            } => {
                let request = StartRequest::clock(hours, minutes, seconds);
                let display = self.countdown.start(&request, &self.tz, now);
                self.status = match self.countdown.target() {
                    Some(target) => format!("{display} (target {target})"),
                    None => display.to_string(),
                };
            }
            OperatorCommand::Hold => {
                if !self.countdown.hold(now) {
                    self.status = "Nothing to hold".into();
                }
            }
            OperatorCommand::Resume => {
                if !self.countdown.resume(now) {
                    self.status = "Countdown is not on hold".into();
                }
            }
            OperatorCommand::Scrub => self.countdown.scrub(),
            OperatorCommand::Reset => self.countdown.reset(),
            OperatorCommand::Mission(name) => {
                self.settings.mission_name = name;
                self.persist();
            }
            OperatorCommand::HideMission(hide) => {
                self.settings.hide_mission_name = hide;
                self.persist();
            }
            OperatorCommand::Toggle(field) => {
                let token = self.settings.manual_statuses().get(field).toggled();
                self.settings.set_manual(field, token);
                self.status = format!("{field}: {token}");
                self.manual_changed();
            }
            OperatorCommand::SetManual(field, token) => {
                self.settings.set_manual(field, token);
                self.status = format!("{field}: {token}");
                self.manual_changed();
            }
            OperatorCommand::Mode(mode) => self.set_mode(mode),
            OperatorCommand::Source(url) => {
                self.settings.sheet_link = url;
                self.persist();
                self.reconfigure_poller();
            }
            OperatorCommand::Cells {
                range,
                weather,
                vehicle,
            } => {
                self.settings.range_cell = range;
                self.settings.weather_cell = weather;
                self.settings.vehicle_cell = vehicle;
                self.persist();
                self.reconfigure_poller();
            }
            OperatorCommand::Timezone(raw) => {
                self.tz = TimeZoneSetting::parse(&raw);
                self.settings.timezone = raw;
                self.status = format!("Timezone: {:?}", self.tz);
                self.persist();
            }
            OperatorCommand::AutoHolds(seconds) => {
                self.countdown.set_auto_holds(seconds.iter().copied());
                self.settings.auto_hold_times = seconds;
                self.persist();
            }
            OperatorCommand::Status => self.status = self.summary(),
            OperatorCommand::Refresh => self.dispatch(PollerCommand::PollNow),
            OperatorCommand::Reload => self.reload(),
            OperatorCommand::Help => self.status = HELP.to_string(),
            OperatorCommand::Quit => {
                self.dispatch(PollerCommand::Shutdown);
                return Flow::Quit;
            }
        }

        Flow::Continue
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Statuses(statuses) => {
                if statuses != self.sheet_statuses {
                    self.sheet_statuses = statuses;
                    self.board_dirty = true;
                }
            }
            UiEvent::FallbackEngaged { embed_url } if embed_url.trim().is_empty() => {
                self.status = "Sheet unreachable and no page to embed".into();
            }
            UiEvent::FallbackEngaged { embed_url } => {
                self.status = format!("Sheet unreachable; embedding {embed_url}");
                self.fallback_embed = Some(embed_url);
                self.board_dirty = true;
            }
            UiEvent::FallbackCleared => {
                if self.fallback_embed.take().is_some() {
                    self.status = "Sheet reachable again".into();
                }
                self.board_dirty = true;
            }
            UiEvent::Info(message) => self.status = message,
        }
    }

    /// Advances the countdown and rewrites the overlays. The board is
    /// rewritten when it changed and otherwise at its own reload cadence.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let display = self.countdown.tick(now);
        let countdown_result = self.writer.write_countdown(
            self.settings.mission_name_or_default(),
            &display.to_string(),
            &self.settings.appearance,
            self.settings.hide_mission_name,
        );

        let board_due = self.last_board_write.map_or(true, |last| {
            (now - last).to_std().unwrap_or(Duration::ZERO)
                >= Duration::from_millis(u64::from(GONOGO_REFRESH_MS))
        });
        let board_result = if self.board_dirty || board_due {
            let result = match self.board() {
                Board::Statuses(statuses) => {
                    self.writer.write_gonogo(&statuses, &self.settings.appearance)
                }
                Board::Embedded(embed_url) => self
                    .writer
                    .write_gonogo_fallback(&embed_url, &self.settings.appearance),
            };
            if result.is_ok() {
                self.board_dirty = false;
                self.last_board_write = Some(now);
            }
            result
        } else {
            Ok(())
        };

        match countdown_result.and(board_result) {
            Ok(()) => {
                if std::mem::take(&mut self.overlay_failing) {
                    info!(dir = %self.writer.dir().display(), "overlay writes recovered");
                }
            }
            Err(error) => {
                if !self.overlay_failing {
                    warn!(%error, "overlay write failed");
                    self.status = format!("Overlay write failed: {error}");
                }
                self.overlay_failing = true;
            }
        }
    }

    fn set_mode(&mut self, mode: SourceMode) {
        self.settings.mode = mode;
        self.board_dirty = true;
        self.persist();
        match mode {
            SourceMode::Spreadsheet => self.dispatch(PollerCommand::Resume),
            SourceMode::Buttons => self.dispatch(PollerCommand::Pause),
        }
        info!(?mode, "status source changed");
    }

    fn manual_changed(&mut self) {
        if self.settings.mode == SourceMode::Buttons {
            self.board_dirty = true;
        }
        self.persist();
    }

    fn reconfigure_poller(&mut self) {
        self.fallback_embed = None;
        self.board_dirty = true;
        self.dispatch(PollerCommand::Reconfigure(sheet_source_from(&self.settings)));
    }

    fn reload(&mut self) {
        self.settings = self.store.load();
        self.tz = TimeZoneSetting::parse(&self.settings.timezone);
        self.countdown
            .set_auto_holds(self.settings.auto_hold_times.iter().copied());
        self.reconfigure_poller();
        let mode = self.settings.mode;
        self.set_mode(mode);
        self.status = format!("Reloaded {}", self.store.path().display());
    }

    fn persist(&mut self) {
        if let Err(error) = self.store.save(&self.settings) {
            warn!("failed to save settings: {error:#}");
            self.status = format!("Settings not saved: {error}");
        }
    }

    fn dispatch(&mut self, command: PollerCommand) {
        dispatch_poller_command(&self.poller_tx, command, &mut self.status);
    }

    fn summary(&self) -> String {
        let board = match self.board() {
            Board::Statuses(statuses) => statuses.to_string(),
            Board::Embedded(embed_url) => format!("embedded sheet {embed_url}"),
        };
        format!(
            "{} | {:?} | mission '{}' | mode {:?} | board {}",
            self.countdown.display(),
            self.countdown.phase(),
            self.settings.mission_name_or_default(),
            self.settings.mode,
            board,
        )
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
