//! Bridge between the foreground loop and the status poll worker.

pub mod commands;
pub mod runtime;
