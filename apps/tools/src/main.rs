use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use countdown::{TimeZoneSetting, TimerDisplay};
use overlay::OverlayWriter;
use shared::domain::{SourceMode, StatusField, StatusToken, StatusTriple};
use status_client::{CellMap, PollerConfig, SheetSource, StatusPoller};
use storage::{Settings, SettingsStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Inspect and edit launch countdown settings")]
struct Cli {
    /// Directory holding settings.json and the overlay pages.
    #[arg(long)]
    app_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default settings file if none exists.
    Init,
    Show,
    SetMode {
        mode: String,
    },
    SetSource {
        url: String,
        #[arg(long)]
        range: Option<String>,
        #[arg(long)]
        weather: Option<String>,
        #[arg(long)]
        vehicle: Option<String>,
        /// Page to embed when the CSV export keeps failing.
        #[arg(long)]
        embed: Option<String>,
    },
    SetManual {
        field: String,
        value: String,
    },
    SetTimezone {
        timezone: String,
    },
    /// Replace the auto-hold marks (seconds before T).
    AutoHolds {
        seconds: Vec<u32>,
    },
    /// Poll the configured sheet once and print the statuses.
    Fetch {
        /// Also rewrite the Go/No-Go overlay with the result.
        #[arg(long)]
        write: bool,
    },
    /// Render both overlay pages from the saved settings.
    Render,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter("warn"))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let app_dir = cli.app_dir.unwrap_or_else(storage::resolve_app_dir);
    let store = SettingsStore::in_dir(&app_dir);

    match cli.command {
        Command::Init => {
            let settings = store.load();
            println!("settings at {}", store.path().display());
            print_settings(&settings)?;
        }
        Command::Show => print_settings(&store.try_load()?)?,
        Command::SetMode { mode } => {
            let Some(mode) = SourceMode::parse(&mode) else {
                bail!("unknown mode '{mode}'; use spreadsheet or buttons");
            };
            update(&store, |settings| settings.mode = mode)?;
        }
        Command::SetSource {
            url,
            range,
            weather,
            vehicle,
            embed,
        } => {
            for cell in [&range, &weather, &vehicle].into_iter().flatten() {
                cell.parse::<shared::cell::CellRef>()
                    .with_context(|| format!("invalid cell reference '{cell}'"))?;
            }
            update(&store, |settings| {
                settings.sheet_link = url;
                if let Some(range) = range {
                    settings.range_cell = range;
                }
                if let Some(weather) = weather {
                    settings.weather_cell = weather;
                }
                if let Some(vehicle) = vehicle {
                    settings.vehicle_cell = vehicle;
                }
                if embed.is_some() {
                    settings.fallback_embed_url = embed;
                }
            })?;
        }
        Command::SetManual { field, value } => {
            let Some(field) = StatusField::parse(&field) else {
                bail!("unknown field '{field}'; use range, weather or vehicle");
            };
            let token = manual_token(&value)?;
            update(&store, |settings| settings.set_manual(field, token))?;
            println!("{field}: {token}");
        }
        Command::SetTimezone { timezone } => {
            let parsed = TimeZoneSetting::parse(&timezone);
            update(&store, |settings| settings.timezone = timezone)?;
            println!("timezone: {parsed:?}");
        }
        Command::AutoHolds { seconds } => {
            update(&store, |settings| settings.auto_hold_times = seconds)?;
        }
        Command::Fetch { write } => {
            let settings = store.try_load()?;
            let source = SheetSource {
                url: settings.sheet_link.clone(),
                cells: CellMap {
                    range: settings.range_cell.clone(),
                    weather: settings.weather_cell.clone(),
                    vehicle: settings.vehicle_cell.clone(),
                },
                embed_url: settings.fallback_embed_url.clone(),
            };
            let mut poller = StatusPoller::http(source, PollerConfig::default())?;
            let statuses = poller.poll().await?;
            println!("{statuses}");
            if write {
                OverlayWriter::new(&app_dir).write_gonogo(&statuses, &settings.appearance)?;
            }
        }
        Command::Render => {
            let settings = store.try_load()?;
            let writer = OverlayWriter::new(&app_dir);
            writer.write_countdown(
                settings.mission_name_or_default(),
                &TimerDisplay::Idle.to_string(),
                &settings.appearance,
                settings.hide_mission_name,
            )?;
            let statuses = match settings.mode {
                SourceMode::Buttons => settings.manual_statuses(),
                SourceMode::Spreadsheet => StatusTriple::unavailable(),
            };
            writer.write_gonogo(&statuses, &settings.appearance)?;
            println!("{}", writer.countdown_path().display());
            println!("{}", writer.gonogo_path().display());
        }
    }

    Ok(())
}

/// `RUST_LOG` when set, otherwise `default`.
fn log_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn manual_token(value: &str) -> Result<StatusToken> {
    match StatusToken::parse_manual(value) {
        Some(token) => Ok(token),
        None => bail!("'{value}' is not GO, NO-GO or N/A"),
    }
}

fn update(store: &SettingsStore, edit: impl FnOnce(&mut Settings)) -> Result<()> {
    // A corrupt file is an error here rather than silently replaced.
    let mut settings = if store.path().exists() {
        store.try_load()?
    } else {
        Settings::default()
    };
    edit(&mut settings);
    store.save(&settings)?;
    println!("saved {}", store.path().display());
    Ok(())
}

fn print_settings(settings: &Settings) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
