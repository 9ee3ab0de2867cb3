//! Camera moves: the phase model and the pure math that turns elapsed time into a pose.

pub mod damping;
pub mod duration;
pub mod ease;
pub mod phase;
pub mod state;
