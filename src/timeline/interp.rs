//! Lookups into the pre-calculated tables.

use crate::foundation::core::CameraPose;
use crate::foundation::math::{lerp, lerp_bearing};
use crate::timeline::precalc::{CameraKeyframe, ProgressKeypoint};

/// Pose at `timestamp_ms`, linearly interpolated between the two surrounding keyframes.
///
/// Timestamps outside the table clamp to its first or last keyframe. A timestamp equal to a
/// keyframe's returns that keyframe's pose unchanged. `None` only for an empty table.
pub fn interpolate_pose(keyframes: &[CameraKeyframe], timestamp_ms: f64) -> Option<CameraPose> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;
    if timestamp_ms.is_nan() || timestamp_ms <= first.timestamp_ms {
        return Some(first.pose);
    }
    if timestamp_ms >= last.timestamp_ms {
        return Some(last.pose);
    }

    let idx = keyframes.partition_point(|k| k.timestamp_ms <= timestamp_ms);
    let (a, b) = (&keyframes[idx - 1], &keyframes[idx]);
    if a.timestamp_ms == timestamp_ms {
        return Some(a.pose);
    }
    let span = b.timestamp_ms - a.timestamp_ms;
    if span <= 0.0 {
        return Some(a.pose);
    }
    let t = (timestamp_ms - a.timestamp_ms) / span;
    Some(CameraPose {
        longitude: lerp(a.pose.longitude, b.pose.longitude, t),
        latitude: lerp(a.pose.latitude, b.pose.latitude, t),
        altitude: lerp(a.pose.altitude, b.pose.altitude, t),
        bearing: lerp_bearing(a.pose.bearing, b.pose.bearing, t),
        pitch: lerp(a.pose.pitch, b.pose.pitch, t),
    })
}

/// Keypoint nearest to `timestamp_ms`; ties go to the earlier one.
pub fn interpolate_progress(
    keypoints: &[ProgressKeypoint],
    timestamp_ms: f64,
) -> Option<&ProgressKeypoint> {
    let first = keypoints.first()?;
    if timestamp_ms.is_nan() || timestamp_ms <= first.timestamp_ms {
        return Some(first);
    }
    let idx = keypoints.partition_point(|k| k.timestamp_ms <= timestamp_ms);
    if idx >= keypoints.len() {
        return keypoints.last();
    }
    let (before, after) = (&keypoints[idx - 1], &keypoints[idx]);
    if timestamp_ms - before.timestamp_ms <= after.timestamp_ms - timestamp_ms {
        Some(before)
    } else {
        Some(after)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interp.rs"]
mod tests;
