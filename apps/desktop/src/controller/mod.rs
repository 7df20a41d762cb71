//! Controller layer: operator commands, poll results and overlay output.

pub mod events;
pub mod orchestration;
pub mod reducer;
