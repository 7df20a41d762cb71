//! Commands queued from the foreground loop to the poll worker.

use status_client::SheetSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerCommand {
    /// New sheet link or cell mapping; polls immediately.
    Reconfigure(SheetSource),
    /// Manual (buttons) mode: stop fetching until resumed.
    Pause,
    Resume,
    PollNow,
    Shutdown,
}

impl PollerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reconfigure(_) => "reconfigure",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::PollNow => "poll_now",
            Self::Shutdown => "shutdown",
        }
    }
}
