//! Go/No-Go status retrieval from a published spreadsheet CSV export.

pub mod backoff;
pub mod poller;
pub mod sheet;
pub mod transport;

pub use backoff::Backoff;
pub use poller::{FallbackTransition, PollReport, PollerConfig, StatusPoller};
pub use sheet::{derive_embed_url, extract_statuses, CellMap, SheetSource};
pub use transport::{HttpTransport, SheetTransport};
