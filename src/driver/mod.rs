//! Mode drivers that feed a [`PreCalculatedAnimation`] to a surface.
//!
//! [`preview::PreviewDriver`] is keyed to a display clock; [`export::ExportDriver`] is keyed to
//! frame indices. Both resolve every pose through [`PreCalculatedAnimation::sample_at`].

use crate::foundation::error::RouteCamResult;
use crate::surface::{RenderSurface, publish_progress};
use crate::timeline::precalc::{FrameSample, PreCalculatedAnimation};

pub mod export;
pub mod preview;

/// Jump the camera to `sample` and publish its progress.
///
/// A non-finite pose is skipped with a warning and `Ok(false)`; the progress sources are still
/// updated since they come from a separate table.
pub(crate) fn apply_sample(
    surface: &dyn RenderSurface,
    animation: &PreCalculatedAnimation,
    sample: &FrameSample,
) -> RouteCamResult<bool> {
    let applied = match sample.pose.ensure_finite() {
        Ok(()) => {
            surface.set_pose(sample.pose, 0.0)?;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, timestamp_ms = sample.timestamp_ms, "skipping frame pose");
            false
        }
    };
    publish_sample_progress(surface, animation, sample)?;
    Ok(applied)
}

pub(crate) fn publish_sample_progress(
    surface: &dyn RenderSurface,
    animation: &PreCalculatedAnimation,
    sample: &FrameSample,
) -> RouteCamResult<()> {
    publish_progress(
        surface,
        sample.progress.partial_route(animation.route()),
        sample.progress.position,
    )
}

pub use export::{ExportDriver, ExportStats, export_plan};
pub use preview::{PreviewDriver, PreviewRun};
