use std::sync::Arc;

use tokio::time::Instant;

use crate::animation::phase::AnimationPhase;
use crate::driver::{apply_sample, publish_sample_progress};
use crate::foundation::core::duration_to_ms;
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::player::cancel::CancellationToken;
use crate::player::phase_player::settle_surface;
use crate::surface::{FrameClock, RenderSurface};
use crate::timeline::precalc::{FrameSample, PreCalculatedAnimation};
use crate::timeline::settings::TransitionMode;

/// Real-time playback keyed to a display clock.
///
/// Each refresh computes `elapsed = start_position + (now - loop_start)` and looks the frame up in
/// the shared tables. In [`TransitionMode::Native`] fly-to and fit-bounds are handed to the
/// surface once at phase entry; everything else jumps the camera every frame.
pub struct PreviewDriver<C> {
    animation: Arc<PreCalculatedAnimation>,
    surface: Arc<dyn RenderSurface>,
    clock: C,
    mode: TransitionMode,
}

/// Outcome of one preview run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewRun {
    pub frames_presented: u64,
    pub end_ms: f64,
}

impl<C: FrameClock> PreviewDriver<C> {
    pub fn new(animation: Arc<PreCalculatedAnimation>, surface: Arc<dyn RenderSurface>, clock: C) -> Self {
        let mode = animation.settings().transition_mode;
        Self {
            animation,
            surface,
            clock,
            mode,
        }
    }

    pub fn with_mode(mut self, mode: TransitionMode) -> Self {
        self.mode = mode;
        self
    }

    pub async fn run(&mut self, token: &CancellationToken) -> RouteCamResult<PreviewRun> {
        self.run_from(0.0, token).await
    }

    /// Play from `position_ms` to the end of the animation.
    ///
    /// Returns `Err(Cancelled)` as soon as `token` fires, after stopping any native transition so
    /// the camera holds where it is.
    #[tracing::instrument(skip(self, token), fields(mode = ?self.mode))]
    pub async fn run_from(
        &mut self,
        position_ms: f64,
        token: &CancellationToken,
    ) -> RouteCamResult<PreviewRun> {
        let total_ms = self.animation.total_duration_ms();
        let position_ms = position_ms.clamp(0.0, total_ms);
        let mut origin: Option<Instant> = None;
        let mut native_phase: Option<usize> = None;
        let mut frames_presented = 0_u64;

        loop {
            let now = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    self.surface.stop_transition();
                    return Err(RouteCamError::Cancelled);
                }
                now = self.clock.next_frame() => now,
            };
            let loop_start = *origin.get_or_insert(now);
            let elapsed_ms = (position_ms + duration_to_ms(now - loop_start)).min(total_ms);

            let sample = self.animation.sample_at(elapsed_ms);
            self.present(&sample, &mut native_phase)?;
            frames_presented += 1;

            if elapsed_ms >= total_ms {
                break;
            }
        }

        if self.surface.is_transition_in_flight() {
            settle_surface(self.surface.as_ref(), 0.0, token).await?;
        }
        tracing::debug!(frames_presented, "preview finished");
        Ok(PreviewRun {
            frames_presented,
            end_ms: total_ms,
        })
    }

    fn present(&self, sample: &FrameSample, native_phase: &mut Option<usize>) -> RouteCamResult<()> {
        let surface = self.surface.as_ref();
        if self.mode == TransitionMode::Computed {
            return apply_sample(surface, &self.animation, sample).map(|_| ());
        }

        let span = self.animation.spans()[sample.phase_index];
        let remaining_ms = (span.duration_ms - sample.local_ms).max(0.0);
        match &self.animation.sequence().phases()[sample.phase_index] {
            AnimationPhase::FlyTo { params, .. } => {
                if *native_phase != Some(sample.phase_index) {
                    *native_phase = Some(sample.phase_index);
                    surface.set_pose(params.stop_pose(), remaining_ms)?;
                    publish_sample_progress(surface, &self.animation, sample)?;
                }
                Ok(())
            }
            AnimationPhase::FitBounds { params, .. } => {
                if *native_phase != Some(sample.phase_index) {
                    *native_phase = Some(sample.phase_index);
                    surface.fit_to_bounds(
                        params.bounds,
                        params.padding,
                        params.bearing,
                        params.pitch,
                        remaining_ms,
                    )?;
                    publish_sample_progress(surface, &self.animation, sample)?;
                }
                Ok(())
            }
            _ => {
                *native_phase = None;
                apply_sample(surface, &self.animation, sample).map(|_| ())
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/preview.rs"]
mod tests;
