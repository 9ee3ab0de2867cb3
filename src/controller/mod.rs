//! Playback lifecycle for one animation bound to one surface.

use std::sync::Arc;

use crate::surface::RenderSurface;
use crate::timeline::precalc::PreCalculatedAnimation;

#[allow(clippy::module_inception)]
pub mod controller;
pub mod playback;

pub use controller::{AnimationController, Playback};
pub use playback::{PlaybackClock, PlaybackState, PlaybackStatus};

pub fn create_controller(
    animation: Arc<PreCalculatedAnimation>,
    surface: Arc<dyn RenderSurface>,
) -> AnimationController {
    AnimationController::new(animation, surface)
}
