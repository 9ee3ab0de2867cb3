//! Spherical geometry helpers over `(longitude, latitude)` degree pairs.
//!
//! Every function here is total: degenerate input (identical points, empty or single-point paths)
//! yields a defined value instead of an error.

use crate::foundation::core::{Bounds, LngLat, Point};
use crate::foundation::math::{lerp, normalize_bearing};

/// Mean earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle (haversine) distance in kilometers.
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    let phi1 = a.y.to_radians();
    let phi2 = b.y.to_radians();
    let d_phi = (b.y - a.y).to_radians();
    let d_lambda = (b.x - a.x).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Sum of consecutive segment distances in kilometers.
pub fn path_length(path: &[LngLat]) -> f64 {
    path.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Running distance from the first point; `out[i]` is the length of `path[..=i]`.
pub fn cumulative_distances(path: &[LngLat]) -> Vec<f64> {
    let mut out = Vec::with_capacity(path.len());
    let mut acc = 0.0;
    for (i, p) in path.iter().enumerate() {
        if i > 0 {
            acc += distance(path[i - 1], *p);
        }
        out.push(acc);
    }
    out
}

/// Point `distance_km` along the path, clamped to the path's extent.
pub fn point_at_distance(path: &[LngLat], distance_km: f64) -> LngLat {
    point_at_distance_with(path, &cumulative_distances(path), distance_km)
}

/// [`point_at_distance`] against precomputed [`cumulative_distances`].
pub(crate) fn point_at_distance_with(path: &[LngLat], cumulative: &[f64], distance_km: f64) -> LngLat {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return Point::ZERO;
    };
    let total = cumulative.last().copied().unwrap_or(0.0);
    if distance_km.is_nan() || distance_km <= 0.0 {
        return *first;
    }
    if distance_km >= total {
        return *last;
    }

    let idx = cumulative.partition_point(|&c| c <= distance_km);
    let (a, b) = (path[idx - 1], path[idx]);
    let seg = cumulative[idx] - cumulative[idx - 1];
    if seg <= 0.0 {
        return a;
    }
    let t = (distance_km - cumulative[idx - 1]) / seg;
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Number of leading vertices strictly before `distance_km`; always at least one.
pub(crate) fn covered_vertex_count(cumulative: &[f64], distance_km: f64) -> usize {
    cumulative.partition_point(|&c| c < distance_km).max(1)
}

/// Every vertex covered by `distance_km`, followed by the interpolated boundary point.
pub(crate) fn slice_to_distance(path: &[LngLat], cumulative: &[f64], distance_km: f64) -> Vec<LngLat> {
    let covered = covered_vertex_count(cumulative, distance_km);
    let boundary = point_at_distance_with(path, cumulative, distance_km);
    partial_path(path, covered, boundary)
}

/// `path[..covered]` with `boundary` appended unless it repeats the last vertex.
pub(crate) fn partial_path(path: &[LngLat], covered: usize, boundary: LngLat) -> Vec<LngLat> {
    let mut out: Vec<LngLat> = path.iter().take(covered).copied().collect();
    if out.last() != Some(&boundary) {
        out.push(boundary);
    }
    out
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)`. Identical points give `0`.
pub fn bearing(from: LngLat, to: LngLat) -> f64 {
    let phi1 = from.y.to_radians();
    let phi2 = to.y.to_radians();
    let d_lambda = (to.x - from.x).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Smallest box containing every point. An empty path yields a zero-sized box at the origin.
pub fn bounds(path: &[LngLat]) -> Bounds {
    let Some(first) = path.first() else {
        return Bounds::ZERO;
    };
    path.iter()
        .fold(Bounds::from_points(*first, *first), |acc, p| acc.union_pt(*p))
}

#[cfg(test)]
#[path = "../../tests/unit/geo/geometry.rs"]
mod tests;
