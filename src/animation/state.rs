//! Phase state calculators: `(elapsed, duration, params, prior state) -> pose`.
//!
//! All calculators are pure. The only carried state is the follow-path bearing, which callers pass
//! back in through [`FollowPathState`] instead of it living anywhere global.

use crate::animation::damping::damp_bearing;
use crate::animation::ease::phase_progress;
use crate::animation::phase::{FitBoundsParams, FlyToParams, FollowPathParams};
use crate::foundation::core::{CameraPose, LngLat};
use crate::foundation::math::{lerp, lerp_bearing};
use crate::geo::geometry::{bearing, distance};
use crate::geo::route::Route;

/// Below this separation (1 mm) two points are too close to define a heading.
const MIN_HEADING_SEPARATION_KM: f64 = 1e-6;

pub fn calculate_fly_to_state(elapsed_ms: f64, duration_ms: f64, params: &FlyToParams) -> CameraPose {
    let progress = phase_progress(elapsed_ms, duration_ms);
    if progress <= 0.0 {
        return params.start_pose();
    }
    if progress >= 1.0 {
        return params.stop_pose();
    }

    let t = params.ease.apply(progress);
    let (from, to) = (params.from, params.to);
    CameraPose {
        longitude: params.target.x,
        latitude: params.target.y,
        altitude: lerp(from.altitude, to.altitude, t),
        bearing: lerp_bearing(from.bearing, to.bearing, t),
        pitch: lerp(from.pitch, to.pitch, t),
    }
}

/// Output of [`calculate_follow_path_state`]; pass it back as `prior` on the next call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowPathState {
    pub pose: CameraPose,
    pub elapsed_ms: f64,
    pub distance_km: f64,
}

pub fn calculate_follow_path_state(
    elapsed_ms: f64,
    duration_ms: f64,
    params: &FollowPathParams,
    prior: Option<&FollowPathState>,
) -> FollowPathState {
    let route = params.route.as_ref();
    let held_bearing = prior.map_or(params.fallback_bearing, |p| p.pose.bearing);

    if route.is_degenerate() {
        return FollowPathState {
            pose: CameraPose::new(route.start(), params.altitude_m, held_bearing, params.pitch),
            elapsed_ms,
            distance_km: 0.0,
        };
    }

    // constant path speed, no easing
    let progress = phase_progress(elapsed_ms, duration_ms);
    let travelled_km = route.length_km() * progress;
    let current = route.point_at(travelled_km);
    let target = look_ahead_bearing(route, current, travelled_km, params.look_ahead_km)
        .unwrap_or(held_bearing);

    let heading = match prior {
        Some(prev) => damp_bearing(
            prev.pose.bearing,
            target,
            params.bearing_damping,
            elapsed_ms - prev.elapsed_ms,
        ),
        None => target,
    };

    FollowPathState {
        pose: CameraPose::new(current, params.altitude_m, heading, params.pitch),
        elapsed_ms,
        distance_km: travelled_km,
    }
}

/// Heading toward the look-ahead point. At the route end, where the look-ahead collapses onto the
/// current position, the trailing direction is used instead.
fn look_ahead_bearing(route: &Route, current: LngLat, travelled_km: f64, look_ahead_km: f64) -> Option<f64> {
    let look_ahead_km = look_ahead_km.max(0.0);
    let ahead = route.point_at(travelled_km + look_ahead_km);
    if distance(current, ahead) > MIN_HEADING_SEPARATION_KM {
        return Some(bearing(current, ahead));
    }
    let behind = route.point_at(travelled_km - look_ahead_km);
    if distance(behind, current) > MIN_HEADING_SEPARATION_KM {
        return Some(bearing(behind, current));
    }
    None
}

/// Ease from the pose the previous phase ended on into the overview described by `params`.
pub fn calculate_fit_bounds_state(
    elapsed_ms: f64,
    duration_ms: f64,
    params: &FitBoundsParams,
    previous: &CameraPose,
) -> CameraPose {
    let progress = phase_progress(elapsed_ms, duration_ms);
    if progress <= 0.0 {
        return *previous;
    }
    let target = params.target_pose();
    if progress >= 1.0 {
        return target;
    }

    let t = params.ease.apply(progress);
    CameraPose {
        longitude: lerp(previous.longitude, target.longitude, t),
        latitude: lerp(previous.latitude, target.latitude, t),
        altitude: lerp(previous.altitude, target.altitude, t),
        bearing: lerp_bearing(previous.bearing, target.bearing, t),
        pitch: lerp(previous.pitch, target.pitch, t),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;
