//! Blocking stdin reader feeding operator lines to the foreground loop.

use std::{
    io::{self, BufRead},
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use tracing::{info, warn};

pub fn spawn_console_reader(line_tx: Sender<String>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".into())
        .spawn(move || read_lines(io::stdin().lock(), &line_tx))
}

/// Forwards non-blank lines until EOF. Closing stdin does not stop the
/// countdown; the overlays keep updating until `quit` or Ctrl-C.
pub fn read_lines(input: impl BufRead, line_tx: &Sender<String>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "failed to read console input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        if line_tx.send(line).is_err() {
            return;
        }
    }
    info!("console input closed; overlays keep running");
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
