use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::controller::playback::{PlaybackClock, PlaybackState, PlaybackStatus};
use crate::driver::preview::{PreviewDriver, PreviewRun};
use crate::driver::publish_sample_progress;
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::player::cancel::CancellationToken;
use crate::surface::clock::{DEFAULT_REFRESH_HZ, IntervalFrameClock};
use crate::surface::RenderSurface;
use crate::timeline::precalc::PreCalculatedAnimation;

/// Shared playback bookkeeping. `run_id` tells a finishing preview task whether it is still the
/// current run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Playback {
    pub state: PlaybackState,
    pub clock: PlaybackClock,
    pub run_id: u64,
}

struct ActiveRun {
    token: CancellationToken,
    handle: JoinHandle<RouteCamResult<PreviewRun>>,
}

/// Play/pause/resume/stop/replay state machine over one bound animation and surface.
///
/// ```text
/// Idle -> Playing <-> Paused
///            |           |
///            v           v
///         Stopped -> Playing (replay)
/// ```
///
/// Each run of the preview driver is a spawned task with its own [`CancellationToken`]. Pausing
/// cancels the run and remembers the position; resuming starts a new run from there.
pub struct AnimationController {
    animation: Arc<PreCalculatedAnimation>,
    surface: Arc<dyn RenderSurface>,
    refresh_hz: f64,
    playback: Arc<watch::Sender<Playback>>,
    active: Option<ActiveRun>,
}

impl AnimationController {
    pub fn new(animation: Arc<PreCalculatedAnimation>, surface: Arc<dyn RenderSurface>) -> Self {
        let (tx, _rx) = watch::channel(Playback::default());
        Self {
            animation,
            surface,
            refresh_hz: DEFAULT_REFRESH_HZ,
            playback: Arc::new(tx),
            active: None,
        }
    }

    /// Display refresh rate of the preview loop.
    pub fn with_refresh_hz(mut self, refresh_hz: f64) -> Self {
        self.refresh_hz = refresh_hz;
        self
    }

    pub fn animation(&self) -> &Arc<PreCalculatedAnimation> {
        &self.animation
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.borrow().state
    }

    pub fn status(&self) -> PlaybackStatus {
        let p = *self.playback.borrow();
        PlaybackStatus {
            state: p.state,
            elapsed_ms: p
                .clock
                .elapsed_ms(Instant::now())
                .min(self.animation.total_duration_ms()),
        }
    }

    /// Receive every state change, including natural completion.
    pub fn subscribe(&self) -> watch::Receiver<Playback> {
        self.playback.subscribe()
    }

    /// Token of the current run. Cancelling it externally makes [`AnimationController::wait`]
    /// return [`RouteCamError::Cancelled`].
    pub fn token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(|run| run.token.clone())
    }

    /// Start playback from the beginning. No-op while playing; resumes when paused.
    ///
    /// The clock holds at zero until the surface has loaded and the first frame is due.
    pub async fn play(&mut self) -> RouteCamResult<()> {
        match self.state() {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => self.resume().await,
            PlaybackState::Idle | PlaybackState::Stopped => {
                self.reap().await;
                let run_id = self.transition(PlaybackState::Playing, PlaybackClock::reset);
                self.spawn_run(0.0, run_id)
            }
        }
    }

    pub async fn pause(&mut self) -> RouteCamResult<()> {
        self.require(PlaybackState::Playing, "pause")?;
        let now = Instant::now();
        self.transition(PlaybackState::Paused, |c| {
            c.pause(now);
        });
        self.cancel_active().await;
        Ok(())
    }

    pub async fn resume(&mut self) -> RouteCamResult<()> {
        self.require(PlaybackState::Paused, "resume")?;
        self.reap().await;
        // stays frozen at the paused position until the new run anchors it
        let run_id = self.transition(PlaybackState::Playing, |_| {});
        let position = self.playback.borrow().clock.paused_position_ms();
        self.spawn_run(position, run_id)
    }

    /// Cancel any run, put the camera back on its first pose and go to `Stopped`.
    ///
    /// The state is `Stopped` even when the surface rejects the reset pose; the error is still
    /// returned.
    pub async fn stop(&mut self) -> RouteCamResult<()> {
        self.cancel_active().await;
        self.surface.stop_transition();
        self.transition(PlaybackState::Stopped, PlaybackClock::reset);

        let first = self.animation.sample_at(0.0);
        self.surface.set_pose(first.pose, 0.0)?;
        publish_sample_progress(self.surface.as_ref(), &self.animation, &first)
    }

    pub async fn replay(&mut self) -> RouteCamResult<()> {
        self.stop().await?;
        self.play().await
    }

    /// Wait for the current run to end. `Err(Cancelled)` if it was cancelled from outside.
    pub async fn wait(&mut self) -> RouteCamResult<()> {
        match self.active.take() {
            Some(run) => join(run.handle).await.map(|_| ()),
            None => Ok(()),
        }
    }

    fn require(&self, expected: PlaybackState, op: &str) -> RouteCamResult<()> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(RouteCamError::invalid_input(format!(
                "{op} is only valid while {expected:?}, controller is {state:?}"
            )))
        }
    }

    /// Set the state, update the clock, and bump the run id. Returns the new run id.
    fn transition(&self, state: PlaybackState, update: impl FnOnce(&mut PlaybackClock)) -> u64 {
        let mut run_id = 0;
        self.playback.send_modify(|p| {
            tracing::debug!(from = ?p.state, to = ?state, "playback transition");
            p.state = state;
            update(&mut p.clock);
            p.run_id += 1;
            run_id = p.run_id;
        });
        run_id
    }

    fn spawn_run(&mut self, position_ms: f64, run_id: u64) -> RouteCamResult<()> {
        let clock = IntervalFrameClock::new(self.refresh_hz)?;
        let token = CancellationToken::new();
        let mut driver = PreviewDriver::new(
            Arc::clone(&self.animation),
            Arc::clone(&self.surface),
            clock,
        );
        let surface = Arc::clone(&self.surface);
        let playback = Arc::clone(&self.playback);
        let run_token = token.clone();
        let total_ms = self.animation.total_duration_ms();

        let handle = tokio::spawn(async move {
            let loaded = run_token
                .run_until_cancelled(async {
                    surface.wait_loaded().await;
                    Ok(())
                })
                .await;
            let result = match loaded {
                Ok(()) => {
                    // the driver's first frame is due now; elapsed time starts counting here
                    playback.send_if_modified(|p| {
                        if p.run_id != run_id || p.state != PlaybackState::Playing {
                            return false;
                        }
                        p.clock.resume(Instant::now());
                        true
                    });
                    driver.run_from(position_ms, &run_token).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = &result
                && !e.is_cancelled()
            {
                tracing::warn!(error = %e, "preview run failed");
            }
            // only the current run may settle the state; pause/stop have already moved it on
            playback.send_if_modified(|p| {
                if p.run_id != run_id || p.state != PlaybackState::Playing {
                    return false;
                }
                p.state = PlaybackState::Stopped;
                match &result {
                    Ok(_) => p.clock.finish(total_ms),
                    Err(_) => {
                        p.clock.pause(Instant::now());
                    }
                }
                true
            });
            result
        });

        self.active = Some(ActiveRun { token, handle });
        Ok(())
    }

    async fn cancel_active(&mut self) {
        if let Some(run) = self.active.take() {
            run.token.cancel();
            if let Err(e) = join(run.handle).await
                && !e.is_cancelled()
            {
                tracing::warn!(error = %e, "preview run ended with an error");
            }
        }
    }

    /// Collect a run that already finished on its own.
    async fn reap(&mut self) {
        if let Some(run) = self.active.take() {
            if run.handle.is_finished() {
                let _ = join(run.handle).await;
            } else {
                self.active = Some(run);
                self.cancel_active().await;
            }
        }
    }
}

impl Drop for AnimationController {
    fn drop(&mut self) {
        if let Some(run) = &self.active {
            run.token.cancel();
        }
    }
}

async fn join(handle: JoinHandle<RouteCamResult<PreviewRun>>) -> RouteCamResult<PreviewRun> {
    handle
        .await
        .map_err(|e| RouteCamError::Other(anyhow::anyhow!("preview task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/controller/controller.rs"]
mod tests;
