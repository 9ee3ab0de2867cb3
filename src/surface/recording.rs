use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::foundation::core::{
    Bounds, CameraPose, Edges, Point, duration_to_ms, ms_to_duration,
};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::surface::{FrameCapture, RenderSurface, SourceGeometry};

/// One command received by a [`RecordingSurface`], stamped with the surface's clock.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    SetPose {
        at_ms: f64,
        pose: CameraPose,
        duration_ms: f64,
    },
    FitToBounds {
        at_ms: f64,
        bounds: Bounds,
        padding: Edges,
        bearing: f64,
        pitch: f64,
        duration_ms: f64,
    },
    UpdateSource {
        at_ms: f64,
        source_id: String,
        geometry: SourceGeometry,
    },
    StopTransition {
        at_ms: f64,
    },
}

#[derive(Debug)]
struct SurfaceState {
    commands: Vec<SurfaceCommand>,
    pose: CameraPose,
    sources: HashMap<String, SourceGeometry>,
    transition_deadline: Option<Instant>,
}

/// In-memory [`RenderSurface`] that records every command and simulates animated transitions.
///
/// A transition with a non-zero duration jumps the recorded pose to its target and stays "in
/// flight" until its deadline on the tokio clock, so tests running on paused time observe the
/// same timing a real surface would report.
#[derive(Debug)]
pub struct RecordingSurface {
    origin: Instant,
    load_delay: Duration,
    swallow_idle: bool,
    state: Mutex<SurfaceState>,
    interrupted: Notify,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            load_delay: Duration::ZERO,
            swallow_idle: false,
            state: Mutex::new(SurfaceState {
                commands: Vec::new(),
                pose: CameraPose::new(Point::ZERO, 0.0, 0.0, 0.0),
                sources: HashMap::new(),
                transition_deadline: None,
            }),
            interrupted: Notify::new(),
        }
    }

    /// Never report idle, to exercise callers' timeout fallbacks.
    pub fn swallowing_idle(mut self) -> Self {
        self.swallow_idle = true;
        self
    }

    /// Delay `wait_loaded` until `delay_ms` after construction.
    pub fn with_load_delay_ms(mut self, delay_ms: f64) -> Self {
        self.load_delay = ms_to_duration(delay_ms);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.lock().commands.clone()
    }

    /// Every pose sent through `set_pose`, in order.
    pub fn poses(&self) -> Vec<CameraPose> {
        self.lock()
            .commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::SetPose { pose, .. } => Some(*pose),
                _ => None,
            })
            .collect()
    }

    /// The camera pose the surface currently shows (or is animating toward).
    pub fn current_pose(&self) -> CameraPose {
        self.lock().pose
    }

    pub fn source(&self, source_id: &str) -> Option<SourceGeometry> {
        self.lock().sources.get(source_id).cloned()
    }

    pub fn clear(&self) {
        self.lock().commands.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_ms(&self) -> f64 {
        duration_to_ms(Instant::now().saturating_duration_since(self.origin))
    }

    fn begin_transition(state: &mut SurfaceState, duration_ms: f64) {
        state.transition_deadline = if duration_ms > 0.0 {
            Some(Instant::now() + ms_to_duration(duration_ms))
        } else {
            None
        };
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn check_duration(duration_ms: f64) -> RouteCamResult<()> {
    if duration_ms.is_finite() && duration_ms >= 0.0 {
        Ok(())
    } else {
        Err(RouteCamError::surface(format!(
            "transition duration must be finite and non-negative, got {duration_ms}"
        )))
    }
}

#[async_trait]
impl RenderSurface for RecordingSurface {
    fn set_pose(&self, pose: CameraPose, duration_ms: f64) -> RouteCamResult<()> {
        check_duration(duration_ms)?;
        let at_ms = self.now_ms();
        let mut state = self.lock();
        state.commands.push(SurfaceCommand::SetPose {
            at_ms,
            pose,
            duration_ms,
        });
        state.pose = pose;
        Self::begin_transition(&mut state, duration_ms);
        Ok(())
    }

    fn fit_to_bounds(
        &self,
        bounds: Bounds,
        padding: Edges,
        bearing: f64,
        pitch: f64,
        duration_ms: f64,
    ) -> RouteCamResult<()> {
        check_duration(duration_ms)?;
        let at_ms = self.now_ms();
        let mut state = self.lock();
        state.commands.push(SurfaceCommand::FitToBounds {
            at_ms,
            bounds,
            padding,
            bearing,
            pitch,
            duration_ms,
        });
        // padding is screen-space; without a viewport the altitude is left as is
        let altitude = state.pose.altitude;
        state.pose = CameraPose::new(bounds.center(), altitude, bearing, pitch);
        Self::begin_transition(&mut state, duration_ms);
        Ok(())
    }

    fn update_source(&self, source_id: &str, geometry: SourceGeometry) -> RouteCamResult<()> {
        let at_ms = self.now_ms();
        let mut state = self.lock();
        state.commands.push(SurfaceCommand::UpdateSource {
            at_ms,
            source_id: source_id.to_owned(),
            geometry: geometry.clone(),
        });
        state.sources.insert(source_id.to_owned(), geometry);
        Ok(())
    }

    fn is_transition_in_flight(&self) -> bool {
        self.lock()
            .transition_deadline
            .is_some_and(|d| d > Instant::now())
    }

    fn stop_transition(&self) {
        let at_ms = self.now_ms();
        {
            let mut state = self.lock();
            state.commands.push(SurfaceCommand::StopTransition { at_ms });
            state.transition_deadline = None;
        }
        self.interrupted.notify_waiters();
    }

    async fn wait_idle(&self) {
        loop {
            // register before reading the deadline so a concurrent stop is not missed
            let notified = self.interrupted.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let deadline = self.lock().transition_deadline;
            match deadline {
                Some(d) if d > Instant::now() => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(d) => {}
                        _ = &mut notified => {}
                    }
                }
                _ => break,
            }
        }
        if self.swallow_idle {
            std::future::pending::<()>().await;
        }
    }

    async fn wait_loaded(&self) {
        tokio::time::sleep_until(self.origin + self.load_delay).await;
    }
}

/// A frame the capture step was asked for, with the pose the surface showed when it was taken.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CapturedFrame {
    pub timestamp_ms: f64,
    pub pose: Option<CameraPose>,
}

/// In-memory [`FrameCapture`] that records requested timestamps.
#[derive(Debug, Default)]
pub struct RecordingCapture {
    observed: Option<Arc<RecordingSurface>>,
    frames: Mutex<Vec<CapturedFrame>>,
    pending: Mutex<Option<f64>>,
}

impl RecordingCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also snapshot `surface`'s current pose for every captured frame.
    pub fn observing(surface: Arc<RecordingSurface>) -> Self {
        Self {
            observed: Some(surface),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> Vec<CapturedFrame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FrameCapture for RecordingCapture {
    fn request_frame_at(&self, timestamp_ms: f64) -> RouteCamResult<()> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *pending {
            return Err(RouteCamError::surface(format!(
                "frame at {timestamp_ms} ms requested before frame at {previous} ms was ready"
            )));
        }
        *pending = Some(timestamp_ms);
        Ok(())
    }

    async fn frame_ready(&self) -> RouteCamResult<()> {
        let timestamp_ms = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| RouteCamError::surface("frame_ready awaited without a request"))?;
        let pose = self.observed.as_ref().map(|s| s.current_pose());
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedFrame { timestamp_ms, pose });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/recording.rs"]
mod tests;
