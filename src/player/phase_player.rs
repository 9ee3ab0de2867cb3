use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use tokio::time::Instant;

use crate::animation::phase::{
    AnimationPhase, AnimationSequence, CustomPhase, FitBoundsParams, FlyToParams,
    FollowPathParams,
};
use crate::animation::state::{FollowPathState, calculate_follow_path_state};
use crate::foundation::core::{duration_to_ms, ms_to_duration};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::player::cancel::CancellationToken;
use crate::surface::clock::{DEFAULT_REFRESH_HZ, FrameClock, IntervalFrameClock};
use crate::surface::{RenderSurface, publish_progress};

/// Grace period past a native transition's duration before its completion is assumed.
pub const TRANSITION_TIMEOUT_BUFFER_MS: f64 = 500.0;

/// Plays phases and sequences against a [`RenderSurface`].
///
/// Fly-to and fit-bounds are handed to the surface's animated transitions. Follow-path runs a
/// per-frame loop that computes each pose and jumps the camera to it. Every await point also
/// watches the cancellation token; on cancel, any native transition is stopped and the call
/// returns [`RouteCamError::Cancelled`].
#[derive(Clone)]
pub struct PhasePlayer {
    surface: Arc<dyn RenderSurface>,
    refresh_hz: f64,
}

impl PhasePlayer {
    pub fn new(surface: Arc<dyn RenderSurface>) -> Self {
        Self {
            surface,
            refresh_hz: DEFAULT_REFRESH_HZ,
        }
    }

    /// Frame rate of follow-path loops.
    pub fn with_refresh_hz(mut self, refresh_hz: f64) -> Self {
        self.refresh_hz = refresh_hz;
        self
    }

    pub fn surface(&self) -> &Arc<dyn RenderSurface> {
        &self.surface
    }

    /// Play phases strictly in order, each awaited before the next starts.
    #[tracing::instrument(skip_all, fields(phases = sequence.len()))]
    pub async fn play_sequence(
        &self,
        sequence: &AnimationSequence,
        token: &CancellationToken,
    ) -> RouteCamResult<()> {
        for (index, phase) in sequence.phases().iter().enumerate() {
            token.check()?;
            tracing::debug!(index, kind = ?phase.kind(), "phase start");
            self.play(phase, token).await?;
        }
        Ok(())
    }

    /// Play one phase. Sync groups recurse, hence the boxed future.
    pub fn play<'a>(
        &'a self,
        phase: &'a AnimationPhase,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, RouteCamResult<()>> {
        async move {
            token.check()?;
            match phase {
                AnimationPhase::Wait { duration_ms } => {
                    // a hold has no surface transition; the camera stays put while a timer runs
                    token
                        .run_until_cancelled(async {
                            tokio::time::sleep(ms_to_duration(*duration_ms)).await;
                            Ok(())
                        })
                        .await
                }
                AnimationPhase::FlyTo {
                    duration_ms,
                    params,
                } => self.fly_to(*duration_ms, params, token).await,
                AnimationPhase::FollowPath {
                    duration_ms,
                    params,
                } => self.follow_path(*duration_ms, params, token).await,
                AnimationPhase::FitBounds {
                    duration_ms,
                    params,
                } => self.fit_bounds(*duration_ms, params, token).await,
                AnimationPhase::Sync(children) => self.sync(children, token).await,
                AnimationPhase::Custom(custom) => self.custom(custom, token).await,
            }
        }
        .boxed()
    }

    async fn fly_to(
        &self,
        duration_ms: f64,
        params: &FlyToParams,
        token: &CancellationToken,
    ) -> RouteCamResult<()> {
        self.surface.set_pose(params.stop_pose(), duration_ms)?;
        self.settle(duration_ms, token).await
    }

    async fn fit_bounds(
        &self,
        duration_ms: f64,
        params: &FitBoundsParams,
        token: &CancellationToken,
    ) -> RouteCamResult<()> {
        self.surface.fit_to_bounds(
            params.bounds,
            params.padding,
            params.bearing,
            params.pitch,
            duration_ms,
        )?;
        self.settle(duration_ms, token).await
    }

    /// Await the surface's idle signal for a native transition of `duration_ms`.
    ///
    /// A missing signal resolves after the timeout buffer with a warning; cancellation stops the
    /// transition before returning.
    pub(crate) async fn settle(
        &self,
        duration_ms: f64,
        token: &CancellationToken,
    ) -> RouteCamResult<()> {
        settle_surface(self.surface.as_ref(), duration_ms, token).await
    }

    async fn follow_path(
        &self,
        duration_ms: f64,
        params: &FollowPathParams,
        token: &CancellationToken,
    ) -> RouteCamResult<()> {
        let mut clock = IntervalFrameClock::new(self.refresh_hz)?;
        let route = params.route.as_ref();
        let mut prior: Option<FollowPathState> = None;
        let mut origin: Option<Instant> = None;

        loop {
            let now = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RouteCamError::Cancelled),
                now = clock.next_frame() => now,
            };
            let start = *origin.get_or_insert(now);
            let elapsed_ms = duration_to_ms(now - start).min(duration_ms.max(0.0));

            let state = calculate_follow_path_state(elapsed_ms, duration_ms, params, prior.as_ref());
            match state.pose.ensure_finite() {
                Ok(()) => {
                    self.surface.set_pose(state.pose, 0.0)?;
                    publish_progress(
                        self.surface.as_ref(),
                        route.slice_to(state.distance_km),
                        state.pose.position(),
                    )?;
                    prior = Some(state);
                }
                Err(e) => tracing::warn!(error = %e, elapsed_ms, "skipping follow-path frame"),
            }

            if elapsed_ms >= duration_ms {
                return Ok(());
            }
        }
    }

    /// All children start together; the group settles once every child has, reporting the first
    /// failure.
    async fn sync(&self, children: &[AnimationPhase], token: &CancellationToken) -> RouteCamResult<()> {
        let results = join_all(children.iter().map(|child| self.play(child, token))).await;
        results.into_iter().collect::<RouteCamResult<Vec<()>>>().map(|_| ())
    }

    async fn custom(&self, custom: &CustomPhase, token: &CancellationToken) -> RouteCamResult<()> {
        let run = custom.start(Arc::clone(&self.surface), token.clone());
        let surface = self.surface.as_ref();
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                surface.stop_transition();
                Err(RouteCamError::Cancelled)
            }
            r = run => r,
        }
    }
}

pub(crate) async fn settle_surface(
    surface: &dyn RenderSurface,
    duration_ms: f64,
    token: &CancellationToken,
) -> RouteCamResult<()> {
    let wait_ms = duration_ms.max(0.0) + TRANSITION_TIMEOUT_BUFFER_MS;
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            surface.stop_transition();
            Err(RouteCamError::Cancelled)
        }
        _ = surface.wait_idle() => Ok(()),
        _ = tokio::time::sleep(ms_to_duration(wait_ms)) => {
            let err = RouteCamError::RenderTimeout {
                waited_ms: wait_ms.round() as u64,
            };
            tracing::warn!(error = %err, "transition never reported idle; continuing");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/phase_player.rs"]
mod tests;
