use crate::animation::ease::Ease;
use crate::foundation::core::{Edges, Fps};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::foundation::math::lerp;

/// How the preview driver plays fly-to and fit-bounds phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Hand the move to the surface's own animated transition at phase entry.
    #[default]
    Native,
    /// Push an engine-computed pose every frame, identical to what export captures.
    Computed,
}

/// User-facing knobs for one route animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// 0 = loose, high, far-looking camera; 1 = tight, low, twitchy camera.
    pub follow_strength: f64,
    /// Fixed travel speed. `None` derives the follow-path duration from route length and shape.
    pub speed_km_per_s: Option<f64>,
    /// Export frame rate; also the cadence of the route-progress table.
    pub fps: Fps,
    pub overview_altitude_m: f64,
    pub overview_pitch: f64,
    pub overview_bearing: f64,
    pub padding: Edges,
    /// Curve of the opening descent onto the route start.
    pub fly_to_ease: Ease,
    /// Curve of the closing pull-back into the overview.
    pub fit_bounds_ease: Ease,
    pub transition_mode: TransitionMode,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            follow_strength: 0.5,
            speed_km_per_s: None,
            fps: Fps::default(),
            overview_altitude_m: 12_000.0,
            overview_pitch: 0.0,
            overview_bearing: 0.0,
            padding: Edges::default(),
            fly_to_ease: Ease::OutCubic,
            fit_bounds_ease: Ease::OutCubic,
            transition_mode: TransitionMode::Native,
        }
    }
}

/// Follow-path camera parameters derived from [`AnimationSettings::follow_strength`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FollowTuning {
    pub look_ahead_km: f64,
    pub bearing_damping: f64,
    pub altitude_m: f64,
    pub pitch: f64,
}

// (loose, tight) ends of each linear map over follow_strength
const LOOK_AHEAD_KM: (f64, f64) = (1.5, 0.3);
const BEARING_DAMPING: (f64, f64) = (0.9, 0.2);
const FOLLOW_ALTITUDE_M: (f64, f64) = (4000.0, 1500.0);
const FOLLOW_PITCH_DEG: (f64, f64) = (50.0, 60.0);

impl AnimationSettings {
    pub fn validate(&self) -> RouteCamResult<()> {
        if !(0.0..=1.0).contains(&self.follow_strength) {
            return Err(RouteCamError::invalid_input(format!(
                "follow_strength must be within [0, 1], got {}",
                self.follow_strength
            )));
        }
        if let Some(speed) = self.speed_km_per_s
            && !(speed.is_finite() && speed > 0.0)
        {
            return Err(RouteCamError::invalid_input(format!(
                "speed_km_per_s must be positive and finite, got {speed}"
            )));
        }
        self.fps.validate()?;
        if !(self.overview_altitude_m.is_finite() && self.overview_altitude_m > 0.0) {
            return Err(RouteCamError::invalid_input(
                "overview_altitude_m must be positive and finite",
            ));
        }
        if !(-90.0..=90.0).contains(&self.overview_pitch) || !self.overview_bearing.is_finite() {
            return Err(RouteCamError::invalid_input(
                "overview pitch must be within [-90, 90] and bearing finite",
            ));
        }
        let p = self.padding;
        if [p.top, p.right, p.bottom, p.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(RouteCamError::invalid_input(
                "padding must be non-negative and finite",
            ));
        }
        Ok(())
    }

    pub fn follow_tuning(&self) -> FollowTuning {
        let s = self.follow_strength.clamp(0.0, 1.0);
        FollowTuning {
            look_ahead_km: lerp(LOOK_AHEAD_KM.0, LOOK_AHEAD_KM.1, s),
            bearing_damping: lerp(BEARING_DAMPING.0, BEARING_DAMPING.1, s),
            altitude_m: lerp(FOLLOW_ALTITUDE_M.0, FOLLOW_ALTITUDE_M.1, s),
            pitch: lerp(FOLLOW_PITCH_DEG.0, FOLLOW_PITCH_DEG.1, s),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/settings.rs"]
mod tests;
