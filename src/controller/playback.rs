use tokio::time::Instant;

use crate::foundation::core::duration_to_ms;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Stopped,
}

/// Read-only snapshot for UIs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub elapsed_ms: f64,
}

/// Animation-elapsed time that excludes paused intervals.
///
/// `elapsed = paused_position + (now - started_at)` while running, `paused_position` otherwise.
/// Resuming only moves `started_at`, so elapsed time is continuous across a pause. A fresh or
/// reset clock resumes from zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackClock {
    started_at: Option<Instant>,
    paused_position_ms: f64,
}

impl PlaybackClock {
    /// Freeze the clock and return the position it froze at.
    pub fn pause(&mut self, now: Instant) -> f64 {
        self.paused_position_ms = self.elapsed_ms(now);
        self.started_at = None;
        self.paused_position_ms
    }

    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Freeze at `position_ms`, e.g. the end of the animation.
    pub fn finish(&mut self, position_ms: f64) {
        self.started_at = None;
        self.paused_position_ms = position_ms;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn paused_position_ms(&self) -> f64 {
        self.paused_position_ms
    }

    pub fn elapsed_ms(&self, now: Instant) -> f64 {
        self.paused_position_ms
            + self
                .started_at
                .map_or(0.0, |s| duration_to_ms(now.saturating_duration_since(s)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/playback.rs"]
mod tests;
