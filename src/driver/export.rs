use std::sync::Arc;

use crate::foundation::core::{FrameIndex, FrameRange, ms_to_duration};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::driver::apply_sample;
use crate::player::cancel::CancellationToken;
use crate::surface::{FrameCapture, RenderSurface};
use crate::timeline::precalc::{FrameSample, PreCalculatedAnimation};

/// How long one frame may wait for the surface to settle before it is captured anyway.
pub const DEFAULT_SETTLE_TIMEOUT_MS: f64 = 5_000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExportStats {
    pub frames_total: u64,
    pub frames_captured: u64,
    /// Frames captured after the settle timeout instead of an idle signal.
    pub settle_timeouts: u64,
}

/// The sample of every export frame, in order. Needs no surface.
pub fn export_plan(animation: &PreCalculatedAnimation) -> Vec<FrameSample> {
    (0..animation.frame_count())
        .map(|i| animation.sample_at(animation.frame_timestamp_ms(FrameIndex(i))))
        .collect()
}

/// Frame-exact playback for capture.
///
/// Frame `i` is posed at `i × 1000/fps` ms, computed from the index alone. The camera always jumps
/// to the pose; the capture step owns the timing.
pub struct ExportDriver {
    animation: Arc<PreCalculatedAnimation>,
    surface: Arc<dyn RenderSurface>,
    capture: Arc<dyn FrameCapture>,
    settle_timeout_ms: f64,
}

impl ExportDriver {
    pub fn new(
        animation: Arc<PreCalculatedAnimation>,
        surface: Arc<dyn RenderSurface>,
        capture: Arc<dyn FrameCapture>,
    ) -> Self {
        Self {
            animation,
            surface,
            capture,
            settle_timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
        }
    }

    pub fn with_settle_timeout_ms(mut self, timeout_ms: f64) -> Self {
        self.settle_timeout_ms = timeout_ms;
        self
    }

    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.animation.frame_count()),
        }
    }

    pub async fn run(&self, token: &CancellationToken) -> RouteCamResult<ExportStats> {
        self.run_range(self.frame_range(), token).await
    }

    /// Export the frames of `range` that exist in the animation.
    #[tracing::instrument(skip(self, token), fields(start = range.start.0, end = range.end.0))]
    pub async fn run_range(
        &self,
        range: FrameRange,
        token: &CancellationToken,
    ) -> RouteCamResult<ExportStats> {
        let range = range.intersect(self.frame_range());
        let mut stats = ExportStats {
            frames_total: range.len_frames(),
            ..ExportStats::default()
        };

        self.surface.stop_transition();
        token.run_until_cancelled(async {
            self.surface.wait_loaded().await;
            Ok(())
        })
        .await?;

        for i in range.start.0..range.end.0 {
            token.check()?;
            let timestamp_ms = self.animation.frame_timestamp_ms(FrameIndex(i));
            let sample = self.animation.sample_at(timestamp_ms);
            apply_sample(self.surface.as_ref(), &self.animation, &sample)?;

            if !self.wait_settled(token).await? {
                stats.settle_timeouts += 1;
                tracing::warn!(
                    error = %RouteCamError::RenderTimeout {
                        waited_ms: self.settle_timeout_ms.round() as u64,
                    },
                    frame = i,
                    "capturing unsettled frame"
                );
            }

            self.capture.request_frame_at(timestamp_ms)?;
            token
                .run_until_cancelled(self.capture.frame_ready())
                .await?;
            stats.frames_captured += 1;
        }

        tracing::debug!(?stats, "export finished");
        Ok(stats)
    }

    /// `Ok(true)` on an idle signal, `Ok(false)` on timeout.
    async fn wait_settled(&self, token: &CancellationToken) -> RouteCamResult<bool> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(RouteCamError::Cancelled),
            _ = self.surface.wait_idle() => Ok(true),
            _ = tokio::time::sleep(ms_to_duration(self.settle_timeout_ms)) => Ok(false),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/export.rs"]
mod tests;
