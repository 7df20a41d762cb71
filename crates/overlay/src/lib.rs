//! Browser-source overlay pages.
//!
//! Both pages are complete HTML documents that reload themselves, so the
//! streaming software only needs a local file URL.

mod render;
mod writer;

pub use render::{render_countdown, render_gonogo, render_gonogo_fallback};
pub use writer::{OverlayError, OverlayWriter, COUNTDOWN_FILE_NAME, GONOGO_FILE_NAME};

pub const COUNTDOWN_REFRESH_MS: u32 = 1000;
pub const GONOGO_REFRESH_MS: u32 = 5000;
