//! Queueing of operator-driven commands onto the poll worker.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::PollerCommand;

pub fn dispatch_poller_command(
    cmd_tx: &Sender<PollerCommand>,
    cmd: PollerCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued poller command"),
        Err(TrySendError::Full(_)) => {
            *status = "Poller command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Status poller is not running; statuses will not refresh".to_string();
        }
    }
}
