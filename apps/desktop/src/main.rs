use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossbeam_channel::{bounded, never, select, tick};
use overlay::OverlayWriter;
use shared::domain::SourceMode;
use storage::SettingsStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod console;
mod controller;

use backend_bridge::{commands::PollerCommand, runtime::spawn_poll_worker};
use config::{load_config, DEFAULT_CONFIG_FILE};
use controller::{
    events::{OperatorCommand, UiEvent, HELP},
    reducer::{sheet_source_from, Controller, Flow},
};

#[derive(Parser, Debug)]
#[command(about = "Launch countdown with browser-source overlays")]
struct Args {
    /// Runtime tuning file (poll cadence, backoff, app directory).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Directory holding settings.json and the overlay pages.
    #[arg(long)]
    app_dir: Option<PathBuf>,
    /// Mission name for this session; saved to settings.
    #[arg(long)]
    mission: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(&args.config);
    if let Some(app_dir) = args.app_dir {
        config.app_dir = app_dir;
    }

    let store = SettingsStore::in_dir(&config.app_dir);
    let mut settings = store.load();
    if let Some(mission) = args.mission {
        settings.mission_name = mission;
        store
            .save(&settings)
            .context("failed to save mission name")?;
    }

    let writer = OverlayWriter::new(&config.app_dir);
    info!(
        dir = %config.app_dir.display(),
        countdown = %writer.countdown_path().display(),
        gonogo = %writer.gonogo_path().display(),
        "writing overlays"
    );

    let (poller_tx, poller_rx) = bounded::<PollerCommand>(32);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let (line_tx, line_rx) = bounded::<String>(64);

    let worker = spawn_poll_worker(
        config.poller,
        sheet_source_from(&settings),
        settings.mode == SourceMode::Buttons,
        poller_rx,
        ui_tx,
    )
    .context("failed to start status poller")?;
    console::spawn_console_reader(line_tx).context("failed to start console reader")?;

    let mut controller = Controller::new(settings, store, writer, poller_tx);
    controller.tick(Utc::now());
    println!("{HELP}");

    let ticker = tick(config.tick_interval);
    let closed_ui = never::<UiEvent>();
    let closed_console = never::<String>();
    let mut ui_open = true;
    let mut console_open = true;
    let mut quit = false;

    loop {
        let ui = if ui_open { &ui_rx } else { &closed_ui };
        let lines = if console_open { &line_rx } else { &closed_console };

        select! {
            recv(ticker) -> _ => controller.tick(Utc::now()),
            recv(ui) -> event => match event {
                Ok(event) => controller.handle_event(event),
                Err(_) => {
                    warn!("status poller exited; board keeps its last state");
                    ui_open = false;
                }
            },
            recv(lines) -> line => match line {
                Ok(line) => {
                    let flow = match OperatorCommand::parse(&line) {
                        Ok(command) => controller.handle_operator(command, Utc::now()),
                        Err(message) => {
                            println!("{message}");
                            Flow::Continue
                        }
                    };
                    controller.tick(Utc::now());
                    quit = flow == Flow::Quit;
                }
                Err(_) => console_open = false,
            },
        }

        if let Some(status) = controller.take_status() {
            println!("{status}");
        }
        if quit {
            break;
        }
    }

    // Releases the poller's command sender so the worker also stops when
    // the shutdown command could not be queued.
    drop(controller);
    if worker.join().is_err() {
        warn!("status poller panicked during shutdown");
    }
    info!("countdown stopped");
    Ok(())
}
