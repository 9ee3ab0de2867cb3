use crate::foundation::math::{normalize_bearing, shortest_bearing_delta};

/// Milliseconds of time constant per unit of damping.
pub const DAMPING_TIME_SCALE_MS: f64 = 100.0;

/// Move `current` toward `target` by exponential time-based smoothing.
///
/// `damping` in `[0, 1]` maps to a time constant of `damping * 100` ms; the step covers
/// `1 - e^(-dt / tau)` of the shortest angular gap. Splitting `dt` into two steps lands on the
/// same heading as one step, and the result never passes the target.
pub fn damp_bearing(current: f64, target: f64, damping: f64, delta_time_ms: f64) -> f64 {
    let diff = shortest_bearing_delta(current, target);
    normalize_bearing(current + diff * smoothing_factor(damping, delta_time_ms))
}

/// Fraction of the remaining gap closed over `delta_time_ms`, in `[0, 1]`.
pub fn smoothing_factor(damping: f64, delta_time_ms: f64) -> f64 {
    if delta_time_ms.is_nan() || delta_time_ms <= 0.0 {
        return 0.0;
    }
    let tau = damping.clamp(0.0, 1.0) * DAMPING_TIME_SCALE_MS;
    if tau.is_nan() || tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-delta_time_ms / tau).exp()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/damping.rs"]
mod tests;
