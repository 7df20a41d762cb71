//! Poll worker thread: owns a Tokio runtime and the status poller, sleeps
//! on its command queue for the current poll/backoff delay.

use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use rand::Rng;
use status_client::{FallbackTransition, PollerConfig, SheetSource, SheetTransport, StatusPoller};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

use crate::backend_bridge::commands::PollerCommand;
use crate::controller::events::UiEvent;

pub fn spawn_poll_worker(
    config: PollerConfig,
    source: SheetSource,
    start_paused: bool,
    cmd_rx: Receiver<PollerCommand>,
    ui_tx: Sender<UiEvent>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("status-poller".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build poll worker runtime: {err}");
                    send_event(
                        &ui_tx,
                        UiEvent::Info(format!("status polling unavailable: {err}")),
                    );
                    return;
                }
            };

            let poller = match StatusPoller::http(source, config) {
                Ok(poller) => poller,
                Err(err) => {
                    error!(error = %err, "failed to build status poller");
                    send_event(
                        &ui_tx,
                        UiEvent::Info(format!("status polling unavailable: {err}")),
                    );
                    return;
                }
            };

            run_poll_loop(&runtime, poller, start_paused, &cmd_rx, &ui_tx);
            info!("status poll worker stopped");
        })
}

/// Drives the poller until shutdown or until the foreground drops its end
/// of the command queue.
pub fn run_poll_loop<T, R>(
    runtime: &Runtime,
    mut poller: StatusPoller<T, R>,
    start_paused: bool,
    cmd_rx: &Receiver<PollerCommand>,
    ui_tx: &Sender<UiEvent>,
) where
    T: SheetTransport,
    R: Rng,
{
    let mut paused = start_paused;
    let mut delay = Duration::ZERO;

    loop {
        let command = if paused {
            match cmd_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        } else {
            match cmd_rx.recv_timeout(delay) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        };

        if let Some(command) = command {
            match command {
                PollerCommand::Reconfigure(source) => {
                    if poller.set_source(source) == Some(FallbackTransition::Cleared) {
                        send_event(ui_tx, UiEvent::FallbackCleared);
                    }
                    delay = Duration::ZERO;
                }
                PollerCommand::Pause => paused = true,
                PollerCommand::Resume => {
                    paused = false;
                    delay = Duration::ZERO;
                }
                PollerCommand::PollNow => delay = Duration::ZERO,
                PollerCommand::Shutdown => break,
            }
            continue;
        }

        let report = runtime.block_on(poller.poll_cycle());
        match report.transition {
            Some(FallbackTransition::Engaged) => send_event(
                ui_tx,
                UiEvent::FallbackEngaged {
                    embed_url: poller.embed_url(),
                },
            ),
            Some(FallbackTransition::Cleared) => send_event(ui_tx, UiEvent::FallbackCleared),
            None => {}
        }
        send_event(ui_tx, UiEvent::Statuses(report.statuses()));
        delay = report.next_delay;
    }
}

fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => warn!("ui event queue is full; dropping poll result"),
        Err(TrySendError::Disconnected(_)) => {
            warn!("foreground loop is gone; dropping poll result")
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
