//! Phase durations as a pure function of the route.
//!
//! Follow-path time grows with route length along a curve pinned at three calibration points
//! (short 10 km -> 4 s, average 25 km -> 10 s, long 130 km -> 60 s). Between calibration points the
//! curve is interpolated on `ln(length)`, outside them it is extended linearly. Twisty routes get up
//! to 30% more time so the camera has room to turn.

use crate::foundation::math::shortest_bearing_delta;
use crate::geo::geometry::bearing;
use crate::geo::route::Route;

/// Fixed duration of the opening fly-to.
pub const FLY_TO_DURATION_MS: f64 = 2000.0;
/// Fixed duration of the closing fit-bounds.
pub const FIT_BOUNDS_DURATION_MS: f64 = 2000.0;

pub const MIN_FOLLOW_PATH_MS: f64 = 4000.0;
pub const MAX_FOLLOW_PATH_MS: f64 = 60000.0;

/// `(route length km, follow-path ms)`, ascending in both.
pub const CALIBRATION: [(f64, f64); 3] = [(10.0, 4000.0), (25.0, 10000.0), (130.0, 60000.0)];

/// Extra time granted to a maximally twisty route.
pub const MAX_COMPLEXITY_BOOST: f64 = 0.3;

/// Evenly spaced samples used to score route complexity.
pub const COMPLEXITY_SAMPLES: usize = 64;

/// A 90 degree heading change between every pair of samples scores 1.0.
const FULL_COMPLEXITY_TURN_DEG: f64 = 90.0;

pub fn fly_to_duration() -> f64 {
    FLY_TO_DURATION_MS
}

pub fn fit_bounds_duration() -> f64 {
    FIT_BOUNDS_DURATION_MS
}

/// Follow-path duration before the complexity boost and clamp.
pub fn base_follow_path_duration(length_km: f64) -> f64 {
    if length_km.is_nan() || length_km <= 0.0 {
        return 0.0;
    }
    let (l0, t0) = CALIBRATION[0];
    let (l2, t2) = CALIBRATION[2];

    if length_km < l0 {
        // straight line through the origin and the shortest calibration point
        return t0 * length_km / l0;
    }
    if length_km > l2 {
        let (l1, t1) = CALIBRATION[1];
        let slope = (t2 - t1) / (l2 - l1);
        return t2 + (length_km - l2) * slope;
    }

    let idx = CALIBRATION
        .windows(2)
        .position(|w| length_km <= w[1].0)
        .unwrap_or(CALIBRATION.len() - 2);
    let (la, ta) = CALIBRATION[idx];
    let (lb, tb) = CALIBRATION[idx + 1];
    let t = (length_km / la).ln() / (lb / la).ln();
    ta + (tb - ta) * t
}

/// Mean heading change between evenly spaced samples, normalized to `[0, 1]`.
pub fn route_complexity(route: &Route) -> f64 {
    if route.is_degenerate() {
        return 0.0;
    }
    let length = route.length_km();
    let samples: Vec<_> = (0..=COMPLEXITY_SAMPLES)
        .map(|i| route.point_at(length * (i as f64) / (COMPLEXITY_SAMPLES as f64)))
        .collect();
    let headings: Vec<f64> = samples
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| bearing(w[0], w[1]))
        .collect();
    if headings.len() < 2 {
        return 0.0;
    }

    let total_turn: f64 = headings
        .windows(2)
        .map(|w| shortest_bearing_delta(w[0], w[1]).abs())
        .sum();
    let mean = total_turn / ((headings.len() - 1) as f64);
    (mean / FULL_COMPLEXITY_TURN_DEG).clamp(0.0, 1.0)
}

/// Follow-path duration for `route` from length and shape, clamped to `[4000, 60000]` ms.
pub fn follow_path_duration(route: &Route) -> f64 {
    let base = base_follow_path_duration(route.length_km());
    let boosted = base * (1.0 + MAX_COMPLEXITY_BOOST * route_complexity(route));
    boosted.clamp(MIN_FOLLOW_PATH_MS, MAX_FOLLOW_PATH_MS)
}

/// Follow-path duration for a fixed travel speed, clamped to `[4000, 60000]` ms.
pub fn follow_path_duration_for_speed(route: &Route, speed_km_per_s: f64) -> f64 {
    let ms = route.length_km() / speed_km_per_s * 1000.0;
    if ms.is_nan() {
        return MIN_FOLLOW_PATH_MS;
    }
    ms.clamp(MIN_FOLLOW_PATH_MS, MAX_FOLLOW_PATH_MS)
}

/// Fly-to + follow-path + fit-bounds. Always within `[8000, 64000]` ms.
pub fn total_duration(route: &Route) -> f64 {
    fly_to_duration() + follow_path_duration(route) + fit_bounds_duration()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/duration.rs"]
mod tests;
