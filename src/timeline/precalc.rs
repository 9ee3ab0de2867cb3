use std::sync::Arc;

use crate::animation::duration::{
    FIT_BOUNDS_DURATION_MS, FLY_TO_DURATION_MS, follow_path_duration,
    follow_path_duration_for_speed,
};
use crate::animation::phase::{
    AnimationPhase, AnimationSequence, FitBoundsParams, FlyToParams, FollowPathParams, PhaseKind,
};
use crate::animation::state::{
    FollowPathState, calculate_fit_bounds_state, calculate_fly_to_state,
    calculate_follow_path_state,
};
use crate::foundation::core::{CameraOrientation, CameraPose, FrameIndex, LngLat};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::foundation::math::normalize_bearing;
use crate::geo::route::Route;
use crate::timeline::interp::{interpolate_pose, interpolate_progress};
use crate::timeline::settings::AnimationSettings;

/// Sampling step of the follow-path keyframe table.
pub const KEYFRAME_INTERVAL_MS: f64 = 50.0;

/// Pre-computed follow-path pose, `timestamp_ms` relative to the phase start.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraKeyframe {
    pub timestamp_ms: f64,
    pub pose: CameraPose,
}

/// Pre-computed route coverage at one export-frame offset into the follow-path phase.
///
/// The partial route is stored as a vertex count into the shared [`Route`] plus the interpolated
/// boundary `position`; see [`ProgressKeypoint::partial_route`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressKeypoint {
    pub timestamp_ms: f64,
    pub covered_vertices: usize,
    pub position: LngLat,
    pub distance_km: f64,
}

impl ProgressKeypoint {
    pub fn partial_route(&self, route: &Route) -> Vec<LngLat> {
        route.partial(self.covered_vertices, self.position)
    }
}

/// Where a phase sits on the animation timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PhaseSpan {
    pub kind: PhaseKind,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl PhaseSpan {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

/// A timestamp resolved to a phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseCursor {
    pub index: usize,
    pub kind: PhaseKind,
    pub local_ms: f64,
}

/// Everything a driver needs to put the camera somewhere for one animation timestamp.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameSample {
    pub timestamp_ms: f64,
    pub phase_index: usize,
    pub phase: PhaseKind,
    pub local_ms: f64,
    pub pose: CameraPose,
    pub progress: ProgressKeypoint,
}

/// Route + settings resolved into a fixed timeline and sampled tables.
///
/// Built once by [`precalculate`] and read-only afterwards. The preview and export drivers both
/// read poses from the same instance, which is what keeps an export identical to its preview.
#[derive(Clone, Debug)]
pub struct PreCalculatedAnimation {
    route: Arc<Route>,
    settings: AnimationSettings,
    sequence: AnimationSequence,
    spans: Vec<PhaseSpan>,
    keyframes: Vec<CameraKeyframe>,
    progress: Vec<ProgressKeypoint>,
    total_duration_ms: f64,
}

/// Alias of [`precalculate`] matching the composer-facing name.
pub fn bind(route: Route, settings: &AnimationSettings) -> RouteCamResult<PreCalculatedAnimation> {
    precalculate(route, settings)
}

/// Build the fly-to / follow-path / fit-bounds timeline for `route` and sample it.
#[tracing::instrument(skip(route, settings), fields(points = route.coordinates().len()))]
pub fn precalculate(
    route: Route,
    settings: &AnimationSettings,
) -> RouteCamResult<PreCalculatedAnimation> {
    settings.validate()?;
    let route = Arc::new(route);
    let tuning = settings.follow_tuning();

    if route.is_degenerate() {
        tracing::warn!(
            error = %RouteCamError::degenerate("route has zero length"),
            "follow-path will hold the start pose"
        );
    }

    let follow_ms = match settings.speed_km_per_s {
        Some(speed) => follow_path_duration_for_speed(&route, speed),
        None => follow_path_duration(&route),
    };

    let follow = FollowPathParams {
        route: Arc::clone(&route),
        altitude_m: tuning.altitude_m,
        pitch: tuning.pitch,
        look_ahead_km: tuning.look_ahead_km,
        bearing_damping: tuning.bearing_damping,
        fallback_bearing: route.initial_bearing(),
    };
    let keyframes = sample_follow_path(&follow, follow_ms);
    let first_pose = keyframes
        .first()
        .map(|k| k.pose)
        .ok_or_else(|| RouteCamError::calculation("follow-path produced no keyframes"))?;

    // the overview orientation opens and closes the animation; keep its heading in [0, 360)
    let overview_bearing = normalize_bearing(settings.overview_bearing);
    let fly_to = FlyToParams {
        target: route.start(),
        from: CameraOrientation {
            altitude: settings.overview_altitude_m,
            bearing: overview_bearing,
            pitch: settings.overview_pitch,
        },
        to: first_pose.orientation(),
        ease: settings.fly_to_ease,
    };
    let fit_bounds = FitBoundsParams {
        bounds: route.bounds(),
        bearing: overview_bearing,
        pitch: settings.overview_pitch,
        padding: settings.padding,
        altitude_m: settings.overview_altitude_m,
        ease: settings.fit_bounds_ease,
    };

    let sequence = AnimationSequence::new(vec![
        AnimationPhase::FlyTo {
            duration_ms: FLY_TO_DURATION_MS,
            params: fly_to,
        },
        AnimationPhase::FollowPath {
            duration_ms: follow_ms,
            params: follow,
        },
        AnimationPhase::FitBounds {
            duration_ms: FIT_BOUNDS_DURATION_MS,
            params: fit_bounds,
        },
    ]);

    let progress = sample_progress(&route, follow_ms, settings.fps.frame_interval_ms());
    let spans = layout_spans(&sequence)?;
    let total_duration_ms = spans.last().map_or(0.0, PhaseSpan::end_ms);

    tracing::debug!(
        length_km = route.length_km(),
        follow_ms,
        total_duration_ms,
        keyframes = keyframes.len(),
        keypoints = progress.len(),
        "pre-calculated animation"
    );

    Ok(PreCalculatedAnimation {
        route,
        settings: settings.clone(),
        sequence,
        spans,
        keyframes,
        progress,
        total_duration_ms,
    })
}

/// Sample the follow-path phase every [`KEYFRAME_INTERVAL_MS`], threading the damped bearing
/// from one sample into the next. The final sample always lands on `duration_ms`.
fn sample_follow_path(params: &FollowPathParams, duration_ms: f64) -> Vec<CameraKeyframe> {
    let first = calculate_follow_path_state(0.0, duration_ms, params, None);
    let mut keyframes = vec![CameraKeyframe {
        timestamp_ms: 0.0,
        pose: first.pose,
    }];
    if params.route.is_degenerate() || duration_ms <= 0.0 {
        return keyframes;
    }

    let steps = (duration_ms / KEYFRAME_INTERVAL_MS).ceil() as u64;
    let mut prior: FollowPathState = first;
    for i in 1..=steps {
        let t = ((i as f64) * KEYFRAME_INTERVAL_MS).min(duration_ms);
        let state = calculate_follow_path_state(t, duration_ms, params, Some(&prior));
        if let Err(e) = state.pose.ensure_finite() {
            tracing::warn!(error = %e, timestamp_ms = t, "skipping keyframe");
            continue;
        }
        keyframes.push(CameraKeyframe {
            timestamp_ms: t,
            pose: state.pose,
        });
        prior = state;
    }
    keyframes
}

/// Sample route coverage at the export frame cadence over the follow-path phase.
fn sample_progress(route: &Route, duration_ms: f64, interval_ms: f64) -> Vec<ProgressKeypoint> {
    let length = route.length_km();
    let steps = if duration_ms > 0.0 {
        (duration_ms / interval_ms).ceil() as u64
    } else {
        0
    };

    (0..=steps)
        .map(|i| {
            let t = ((i as f64) * interval_ms).min(duration_ms.max(0.0));
            let fraction = if duration_ms > 0.0 { t / duration_ms } else { 1.0 };
            let distance_km = length * fraction;
            ProgressKeypoint {
                timestamp_ms: t,
                covered_vertices: route.covered_vertices(distance_km),
                position: route.point_at(distance_km),
                distance_km,
            }
        })
        .collect()
}

fn layout_spans(sequence: &AnimationSequence) -> RouteCamResult<Vec<PhaseSpan>> {
    let mut start_ms = 0.0;
    sequence
        .phases()
        .iter()
        .map(|phase| {
            let duration_ms = phase.duration_ms().ok_or_else(|| {
                RouteCamError::invalid_input(
                    "pre-calculated sequences need a known duration for every phase",
                )
            })?;
            let span = PhaseSpan {
                kind: phase.kind(),
                start_ms,
                duration_ms,
            };
            start_ms += duration_ms;
            Ok(span)
        })
        .collect()
}

impl PreCalculatedAnimation {
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn sequence(&self) -> &AnimationSequence {
        &self.sequence
    }

    pub fn spans(&self) -> &[PhaseSpan] {
        &self.spans
    }

    pub fn keyframes(&self) -> &[CameraKeyframe] {
        &self.keyframes
    }

    pub fn progress(&self) -> &[ProgressKeypoint] {
        &self.progress
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration_ms
    }

    /// Number of export frames, including both `t = 0` and the final pose.
    pub fn frame_count(&self) -> u64 {
        self.settings.fps.frames_for_duration_ms(self.total_duration_ms)
    }

    /// Timestamp of export frame `frame`, clamped to the animation's end.
    pub fn frame_timestamp_ms(&self, frame: FrameIndex) -> f64 {
        self.settings
            .fps
            .frame_timestamp_ms(frame)
            .min(self.total_duration_ms)
    }

    /// Resolve an animation timestamp to a phase. Times past the end land on the last phase's end.
    pub fn phase_at(&self, timestamp_ms: f64) -> PhaseCursor {
        let last = self.spans.len().saturating_sub(1);
        if timestamp_ms >= self.total_duration_ms {
            let span = self.spans[last];
            return PhaseCursor {
                index: last,
                kind: span.kind,
                local_ms: span.duration_ms,
            };
        }
        let t = if timestamp_ms.is_nan() {
            0.0
        } else {
            timestamp_ms.max(0.0)
        };
        let index = self
            .spans
            .iter()
            .position(|s| t < s.end_ms())
            .unwrap_or(last);
        let span = self.spans[index];
        PhaseCursor {
            index,
            kind: span.kind,
            local_ms: (t - span.start_ms).clamp(0.0, span.duration_ms),
        }
    }

    /// Camera pose and route progress at `timestamp_ms`. Pure and deterministic.
    pub fn sample_at(&self, timestamp_ms: f64) -> FrameSample {
        let cursor = self.phase_at(timestamp_ms);
        let span = self.spans[cursor.index];
        let phase = &self.sequence.phases()[cursor.index];
        let local = cursor.local_ms;

        let (pose, progress) = match phase {
            AnimationPhase::FlyTo { duration_ms, params } => (
                calculate_fly_to_state(local, *duration_ms, params),
                self.first_progress(),
            ),
            AnimationPhase::FollowPath { .. } => (
                interpolate_pose(&self.keyframes, local).unwrap_or_else(|| self.follow_end_pose()),
                interpolate_progress(&self.progress, local)
                    .copied()
                    .unwrap_or_else(|| self.first_progress()),
            ),
            AnimationPhase::FitBounds { duration_ms, params } => (
                calculate_fit_bounds_state(local, *duration_ms, params, &self.follow_end_pose()),
                self.last_progress(),
            ),
            AnimationPhase::Wait { .. } | AnimationPhase::Sync(_) | AnimationPhase::Custom(_) => {
                (self.follow_end_pose(), self.last_progress())
            }
        };

        FrameSample {
            timestamp_ms: span.start_ms + local,
            phase_index: cursor.index,
            phase: cursor.kind,
            local_ms: local,
            pose,
            progress,
        }
    }

    /// Pose the camera rests in before playback starts.
    pub fn initial_pose(&self) -> CameraPose {
        self.sample_at(0.0).pose
    }

    pub fn final_pose(&self) -> CameraPose {
        self.sample_at(self.total_duration_ms).pose
    }

    /// Pose the follow-path phase ends on; the fit-bounds phase starts from it.
    pub fn follow_end_pose(&self) -> CameraPose {
        self.keyframes
            .last()
            .map(|k| k.pose)
            .unwrap_or_else(|| CameraPose::new(self.route.start(), 0.0, 0.0, 0.0))
    }

    fn first_progress(&self) -> ProgressKeypoint {
        self.progress.first().copied().unwrap_or(ProgressKeypoint {
            timestamp_ms: 0.0,
            covered_vertices: 1,
            position: self.route.start(),
            distance_km: 0.0,
        })
    }

    fn last_progress(&self) -> ProgressKeypoint {
        self.progress
            .last()
            .copied()
            .unwrap_or_else(|| self.first_progress())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/precalc.rs"]
mod tests;
