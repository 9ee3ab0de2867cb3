//! Executes phases against a rendering surface with cooperative cancellation.

pub mod cancel;
pub mod phase_player;
