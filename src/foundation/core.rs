use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::foundation::math::normalize_bearing;

pub use kurbo::{Point, Rect};

/// A `(longitude, latitude)` pair in degrees. `x` is longitude, `y` is latitude.
pub type LngLat = Point;

/// Axis-aligned longitude/latitude box (`x0` west, `y0` south, `x1` east, `y1` north).
pub type Bounds = Rect;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> RouteCamResult<Self> {
        if start.0 > end.0 {
            return Err(RouteCamError::invalid_input(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Intersect with another range; disjoint ranges collapse to an empty range at `self.start`.
    pub fn intersect(self, other: FrameRange) -> FrameRange {
        let start = self.start.0.max(other.start.0);
        let end = self.end.0.min(other.end.0);
        if start >= end {
            return FrameRange {
                start: self.start,
                end: self.start,
            };
        }
        FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

impl Fps {
    pub fn new(num: u32, den: u32) -> RouteCamResult<Self> {
        if den == 0 {
            return Err(RouteCamError::invalid_input("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(RouteCamError::invalid_input("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn validate(self) -> RouteCamResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    /// Milliseconds between two consecutive export frames.
    pub fn frame_interval_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of frame `i`, computed from the index so it never accumulates rounding drift.
    pub fn frame_timestamp_ms(self, frame: FrameIndex) -> f64 {
        (frame.0 as f64) * 1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `duration_ms`, including the frame at `t = 0`.
    pub fn frames_for_duration_ms(self, duration_ms: f64) -> u64 {
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            return 1;
        }
        (duration_ms / self.frame_interval_ms()).ceil() as u64 + 1
    }
}

/// Padding in screen pixels, used when fitting bounds into the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

/// Camera position and orientation.
///
/// `bearing` is a compass heading in degrees and is kept in `[0, 360)` by every constructor and
/// calculator in this crate. `altitude` is in meters above the ground.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl CameraPose {
    pub fn new(position: LngLat, altitude: f64, bearing: f64, pitch: f64) -> Self {
        Self {
            longitude: position.x,
            latitude: position.y,
            altitude,
            bearing: normalize_bearing(bearing),
            pitch,
        }
    }

    pub fn position(&self) -> LngLat {
        Point::new(self.longitude, self.latitude)
    }

    pub fn orientation(&self) -> CameraOrientation {
        CameraOrientation {
            altitude: self.altitude,
            bearing: self.bearing,
            pitch: self.pitch,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.altitude.is_finite()
            && self.bearing.is_finite()
            && self.pitch.is_finite()
    }

    /// Reject poses produced from a bad geometry query.
    pub fn ensure_finite(&self) -> RouteCamResult<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(RouteCamError::calculation(format!(
                "non-finite camera pose: {self:?}"
            )))
        }
    }
}

/// The orientation half of a [`CameraPose`], for moves that keep the camera over one point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraOrientation {
    pub altitude: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl CameraOrientation {
    pub fn at(self, position: LngLat) -> CameraPose {
        CameraPose::new(position, self.altitude, self.bearing, self.pitch)
    }
}

/// Convert a duration to fractional milliseconds without going through `as_secs_f64`, so whole
/// millisecond durations map to exact integers.
pub fn duration_to_ms(d: std::time::Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Inverse of [`duration_to_ms`]; negative and non-finite inputs map to zero.
pub fn ms_to_duration(ms: f64) -> std::time::Duration {
    if ms.is_finite() && ms > 0.0 {
        std::time::Duration::from_nanos((ms * 1_000_000.0).round() as u64)
    } else {
        std::time::Duration::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
