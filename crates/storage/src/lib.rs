use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use shared::{
    appearance::HtmlAppearance,
    cell::CellRef,
    domain::{SourceMode, StatusField, StatusToken, StatusTriple},
};

pub const APP_DIR_NAME: &str = "RocketLaunchCountdown";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const DEFAULT_MISSION_NAME: &str = "Placeholder Mission";

/// The operator's persisted preferences. Every key is optional on disk; a
/// missing key takes its default so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub mode: SourceMode,
    pub sheet_link: String,
    pub range_cell: String,
    pub weather_cell: String,
    pub vehicle_cell: String,
    pub fallback_embed_url: Option<String>,
    pub hide_mission_name: bool,
    pub mission_name: String,
    pub timezone: String,
    /// Seconds before T at which the countdown holds automatically.
    pub auto_hold_times: Vec<u32>,
    pub manual_range: StatusToken,
    pub manual_weather: StatusToken,
    pub manual_vehicle: StatusToken,
    #[serde(flatten)]
    pub appearance: HtmlAppearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: SourceMode::Spreadsheet,
            sheet_link: String::new(),
            range_cell: "L2".into(),
            weather_cell: "L3".into(),
            vehicle_cell: "L4".into(),
            fallback_embed_url: None,
            hide_mission_name: false,
            mission_name: DEFAULT_MISSION_NAME.into(),
            timezone: "local".into(),
            auto_hold_times: Vec::new(),
            manual_range: StatusToken::NotAvailable,
            manual_weather: StatusToken::NotAvailable,
            manual_vehicle: StatusToken::NotAvailable,
            appearance: HtmlAppearance::default(),
        }
    }
}

impl Settings {
    pub fn manual_statuses(&self) -> StatusTriple {
        StatusTriple::new(self.manual_range, self.manual_weather, self.manual_vehicle)
    }

    pub fn set_manual(&mut self, field: StatusField, token: StatusToken) {
        match field {
            StatusField::Range => self.manual_range = token,
            StatusField::Weather => self.manual_weather = token,
            StatusField::Vehicle => self.manual_vehicle = token,
        }
    }

    pub fn mission_name_or_default(&self) -> &str {
        let trimmed = self.mission_name.trim();
        if trimmed.is_empty() {
            DEFAULT_MISSION_NAME
        } else {
            trimmed
        }
    }
}

/// On-disk shape as written by any version of the app. Older files carry
/// numeric `*_row`/`column` keys instead of cell references, `null` for
/// unset manual values, and `html_*` overrides for the overlay styling.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    mode: Option<SourceMode>,
    sheet_link: Option<String>,
    range_cell: Option<String>,
    weather_cell: Option<String>,
    vehicle_cell: Option<String>,
    range_row: Option<usize>,
    weather_row: Option<usize>,
    vehicle_row: Option<usize>,
    column: Option<usize>,
    fallback_embed_url: Option<String>,
    hide_mission_name: Option<bool>,
    mission_name: Option<String>,
    timezone: Option<String>,
    auto_hold_times: Option<Vec<u32>>,
    manual_range: Option<StatusToken>,
    manual_weather: Option<StatusToken>,
    manual_vehicle: Option<StatusToken>,

    bg_color: Option<String>,
    text_color: Option<String>,
    font_family: Option<String>,
    mission_font_px: Option<u32>,
    timer_font_px: Option<u32>,
    gn_bg_color: Option<String>,
    gn_border_color: Option<String>,
    gn_go_color: Option<String>,
    gn_nogo_color: Option<String>,
    gn_font_px: Option<u32>,

    html_bg_color: Option<String>,
    html_text_color: Option<String>,
    html_font_family: Option<String>,
    html_mission_font_px: Option<u32>,
    html_timer_font_px: Option<u32>,
    html_gn_bg_color: Option<String>,
    html_gn_border_color: Option<String>,
    html_gn_go_color: Option<String>,
    html_gn_nogo_color: Option<String>,
    html_gn_font_px: Option<u32>,
}

impl SettingsFile {
    /// A stored reference wins; otherwise the legacy row/column pair.
    fn cell(&self, stored: &Option<String>, row: Option<usize>, default: &str) -> String {
        if let Some(cell) = stored.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            return cell.to_ascii_uppercase();
        }
        match (row, self.column) {
            (Some(row), column) if row > 0 => {
                CellRef::new(column.filter(|c| *c > 0).unwrap_or(12), row).to_string()
            }
            _ => default.to_string(),
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let defaults = Settings::default();
        let base = defaults.appearance;
        let range_cell = file.cell(&file.range_cell, file.range_row, &defaults.range_cell);
        let weather_cell = file.cell(&file.weather_cell, file.weather_row, &defaults.weather_cell);
        let vehicle_cell = file.cell(&file.vehicle_cell, file.vehicle_row, &defaults.vehicle_cell);

        let appearance = HtmlAppearance {
            bg_color: file.html_bg_color.or(file.bg_color).unwrap_or(base.bg_color),
            text_color: file.html_text_color.or(file.text_color).unwrap_or(base.text_color),
            font_family: file.html_font_family.or(file.font_family).unwrap_or(base.font_family),
            mission_font_px: file
                .html_mission_font_px
                .or(file.mission_font_px)
                .unwrap_or(base.mission_font_px),
            timer_font_px: file
                .html_timer_font_px
                .or(file.timer_font_px)
                .unwrap_or(base.timer_font_px),
            gn_bg_color: file.html_gn_bg_color.or(file.gn_bg_color).unwrap_or(base.gn_bg_color),
            gn_border_color: file
                .html_gn_border_color
                .or(file.gn_border_color)
                .unwrap_or(base.gn_border_color),
            gn_go_color: file.html_gn_go_color.or(file.gn_go_color).unwrap_or(base.gn_go_color),
            gn_nogo_color: file
                .html_gn_nogo_color
                .or(file.gn_nogo_color)
                .unwrap_or(base.gn_nogo_color),
            gn_font_px: file.html_gn_font_px.or(file.gn_font_px).unwrap_or(base.gn_font_px),
        };

        Self {
            mode: file.mode.unwrap_or(defaults.mode),
            sheet_link: file.sheet_link.unwrap_or(defaults.sheet_link),
            range_cell,
            weather_cell,
            vehicle_cell,
            fallback_embed_url: file.fallback_embed_url,
            hide_mission_name: file.hide_mission_name.unwrap_or(defaults.hide_mission_name),
            mission_name: file.mission_name.unwrap_or(defaults.mission_name),
            timezone: file.timezone.unwrap_or(defaults.timezone),
            auto_hold_times: file.auto_hold_times.unwrap_or_default(),
            manual_range: file.manual_range.unwrap_or_default(),
            manual_weather: file.manual_weather.unwrap_or_default(),
            manual_vehicle: file.manual_vehicle.unwrap_or_default(),
            appearance,
        }
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SettingsFile::deserialize(deserializer).map(Settings::from)
    }
}

/// Reads and rewrites the settings document. There is a single writer, so
/// saves replace the whole file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load for tooling: a missing or corrupt file is an error.
    pub fn try_load(&self) -> Result<Settings> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings '{}'", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings '{}'", self.path.display()))
    }

    /// Startup load. A missing file is created with defaults; an unreadable
    /// one is left untouched and defaults are used for this run.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            let settings = Settings::default();
            match self.save(&settings) {
                Ok(()) => info!(path = %self.path.display(), "wrote default settings"),
                Err(error) => warn!(%error, "could not write default settings"),
            }
            return settings;
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(error) => {
                warn!(path = %self.path.display(), "using default settings: {error:#}");
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create settings directory '{}'",
                    parent.display()
                )
            })?;
        }

        let body = serde_json::to_string_pretty(settings).context("failed to encode settings")?;
        fs::write(&self.path, body)
            .with_context(|| format!("failed to write settings '{}'", self.path.display()))
    }
}

/// `<Documents>/RocketLaunchCountdown`, falling back to the home directory
/// and finally the working directory.
pub fn resolve_app_dir() -> PathBuf {
    let base = dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(APP_DIR_NAME)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
