use std::sync::Arc;

use futures::future::BoxFuture;

use crate::animation::ease::Ease;
use crate::foundation::core::{Bounds, CameraOrientation, CameraPose, Edges, LngLat};
use crate::foundation::error::RouteCamResult;
use crate::geo::route::Route;
use crate::player::cancel::CancellationToken;
use crate::surface::RenderSurface;

/// Discriminant of [`AnimationPhase`], for reports and phase lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Wait,
    FlyTo,
    FollowPath,
    FitBounds,
    Sync,
    Custom,
}

/// Camera hovers over `target` while altitude, bearing and pitch ease from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlyToParams {
    pub target: LngLat,
    pub from: CameraOrientation,
    pub to: CameraOrientation,
    #[serde(default)]
    pub ease: Ease,
}

impl FlyToParams {
    pub fn start_pose(&self) -> CameraPose {
        self.from.at(self.target)
    }

    pub fn stop_pose(&self) -> CameraPose {
        self.to.at(self.target)
    }
}

/// Camera travels the route at constant speed, heading toward a look-ahead point.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowPathParams {
    pub route: Arc<Route>,
    pub altitude_m: f64,
    pub pitch: f64,
    pub look_ahead_km: f64,
    /// `[0, 1]`, scaled to a smoothing time constant by [`crate::damp_bearing`].
    pub bearing_damping: f64,
    /// Heading held when the route has no length.
    pub fallback_bearing: f64,
}

/// Camera settles into an overview of `bounds`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitBoundsParams {
    pub bounds: Bounds,
    pub bearing: f64,
    pub pitch: f64,
    pub padding: Edges,
    pub altitude_m: f64,
    #[serde(default)]
    pub ease: Ease,
}

impl FitBoundsParams {
    pub fn target_pose(&self) -> CameraPose {
        CameraPose::new(self.bounds.center(), self.altitude_m, self.bearing, self.pitch)
    }
}

/// Signature of a [`CustomPhase`] body.
pub type CustomPhaseFn = dyn Fn(Arc<dyn RenderSurface>, CancellationToken) -> BoxFuture<'static, RouteCamResult<()>>
    + Send
    + Sync;

/// Caller-supplied phase body. Its duration is unknowable unless declared.
#[derive(Clone)]
pub struct CustomPhase {
    name: String,
    duration_ms: Option<f64>,
    run: Arc<CustomPhaseFn>,
}

impl CustomPhase {
    pub fn new<F>(name: impl Into<String>, duration_ms: Option<f64>, run: F) -> Self
    where
        F: Fn(Arc<dyn RenderSurface>, CancellationToken) -> BoxFuture<'static, RouteCamResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            duration_ms,
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }

    pub(crate) fn start(
        &self,
        surface: Arc<dyn RenderSurface>,
        token: CancellationToken,
    ) -> BoxFuture<'static, RouteCamResult<()>> {
        (self.run)(surface, token)
    }
}

impl std::fmt::Debug for CustomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomPhase")
            .field("name", &self.name)
            .field("duration_ms", &self.duration_ms)
            .finish_non_exhaustive()
    }
}

/// One named camera move.
#[derive(Clone, Debug)]
pub enum AnimationPhase {
    Wait { duration_ms: f64 },
    FlyTo { duration_ms: f64, params: FlyToParams },
    FollowPath { duration_ms: f64, params: FollowPathParams },
    FitBounds { duration_ms: f64, params: FitBoundsParams },
    /// Children start together; the group ends with the slowest child.
    Sync(Vec<AnimationPhase>),
    Custom(CustomPhase),
}

impl AnimationPhase {
    pub fn wait(duration_ms: f64) -> Self {
        Self::Wait { duration_ms }
    }

    pub fn sync(children: impl IntoIterator<Item = AnimationPhase>) -> Self {
        Self::Sync(children.into_iter().collect())
    }

    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Wait { .. } => PhaseKind::Wait,
            Self::FlyTo { .. } => PhaseKind::FlyTo,
            Self::FollowPath { .. } => PhaseKind::FollowPath,
            Self::FitBounds { .. } => PhaseKind::FitBounds,
            Self::Sync(_) => PhaseKind::Sync,
            Self::Custom(_) => PhaseKind::Custom,
        }
    }

    /// Known duration, or `None` when any part of the phase is a custom body without one.
    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            Self::Wait { duration_ms }
            | Self::FlyTo { duration_ms, .. }
            | Self::FollowPath { duration_ms, .. }
            | Self::FitBounds { duration_ms, .. } => Some(*duration_ms),
            Self::Sync(children) => children
                .iter()
                .map(AnimationPhase::duration_ms)
                .try_fold(0.0_f64, |acc, d| d.map(|d| acc.max(d))),
            Self::Custom(custom) => custom.duration_ms(),
        }
    }
}

/// Ordered list of phases played back to back.
#[derive(Clone, Debug, Default)]
pub struct AnimationSequence {
    phases: Vec<AnimationPhase>,
}

impl AnimationSequence {
    pub fn new(phases: Vec<AnimationPhase>) -> Self {
        Self { phases }
    }

    pub fn push(&mut self, phase: AnimationPhase) {
        self.phases.push(phase);
    }

    pub fn phases(&self) -> &[AnimationPhase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Sum of child durations; `None` if any phase has an unknowable duration.
    pub fn total_duration_ms(&self) -> Option<f64> {
        self.phases
            .iter()
            .map(AnimationPhase::duration_ms)
            .try_fold(0.0_f64, |acc, d| d.map(|d| acc + d))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
