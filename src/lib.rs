//! routecam turns a GPS route into a camera animation timeline.
//!
//! A route and a handful of settings are resolved once into a [`PreCalculatedAnimation`]: a
//! fixed fly-to / follow-path / fit-bounds timeline plus sampled keyframe and route-progress
//! tables. Two drivers read that one object:
//!
//! 1. **Preview**: [`PreviewDriver`] (usually via [`AnimationController`]) plays it in real time
//!    against a [`RenderSurface`], keyed to a display clock, with pause/resume/stop/replay.
//! 2. **Export**: [`ExportDriver`] poses the surface at `i × 1000/fps` ms for every frame index and
//!    hands each settled frame to a [`FrameCapture`].
//!
//! Because both drivers sample the same tables, an export never drifts from its preview.
//!
//! The design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure calculators**: every pose is a function of explicit inputs; the follow-path bearing is
//!   threaded through [`FollowPathState`] rather than kept anywhere global.
//! - **Cooperative cancellation**: every await point watches a [`CancellationToken`] and unwinds
//!   with [`RouteCamError::Cancelled`].
//!
//! For a walkthrough of the API see [`crate::guide`].
#![forbid(unsafe_code)]

mod animation;
mod controller;
mod driver;
mod foundation;
mod geo;
mod player;
mod surface;
mod timeline;

/// Standalone walkthrough of routecam's concepts and API.
pub mod guide;

pub use animation::damping::{DAMPING_TIME_SCALE_MS, damp_bearing, smoothing_factor};
pub use animation::duration::{
    FIT_BOUNDS_DURATION_MS, FLY_TO_DURATION_MS, MAX_FOLLOW_PATH_MS, MIN_FOLLOW_PATH_MS,
    base_follow_path_duration, fit_bounds_duration, fly_to_duration, follow_path_duration,
    follow_path_duration_for_speed, route_complexity, total_duration,
};
pub use animation::ease::{Ease, phase_progress};
pub use animation::phase::{
    AnimationPhase, AnimationSequence, CustomPhase, CustomPhaseFn, FitBoundsParams, FlyToParams,
    FollowPathParams, PhaseKind,
};
pub use animation::state::{
    FollowPathState, calculate_fit_bounds_state, calculate_fly_to_state,
    calculate_follow_path_state,
};
pub use controller::{
    AnimationController, Playback, PlaybackClock, PlaybackState, PlaybackStatus,
    create_controller,
};
pub use driver::{ExportDriver, ExportStats, PreviewDriver, PreviewRun, export_plan};
pub use foundation::core::{
    Bounds, CameraOrientation, CameraPose, Edges, Fps, FrameIndex, FrameRange, LngLat, Point, Rect,
    duration_to_ms, ms_to_duration,
};
pub use foundation::error::{RouteCamError, RouteCamResult};
pub use foundation::math::{lerp, lerp_bearing, normalize_bearing, shortest_bearing_delta};
pub use geo::geometry::{
    EARTH_RADIUS_KM, bearing, bounds, cumulative_distances, distance, path_length,
    point_at_distance,
};
pub use geo::route::Route;
pub use player::cancel::CancellationToken;
pub use player::phase_player::{PhasePlayer, TRANSITION_TIMEOUT_BUFFER_MS};
pub use surface::clock::{DEFAULT_REFRESH_HZ, FrameClock, IntervalFrameClock};
pub use surface::recording::{CapturedFrame, RecordingCapture, RecordingSurface, SurfaceCommand};
pub use surface::{
    FrameCapture, ROUTE_POSITION_SOURCE, ROUTE_PROGRESS_SOURCE, RenderSurface, SourceGeometry,
    publish_progress,
};
pub use timeline::interp::{interpolate_pose, interpolate_progress};
pub use timeline::precalc::{
    CameraKeyframe, FrameSample, KEYFRAME_INTERVAL_MS, PhaseCursor, PhaseSpan,
    PreCalculatedAnimation, ProgressKeypoint, bind, precalculate,
};
pub use timeline::settings::{AnimationSettings, FollowTuning, TransitionMode};
