use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::foundation::core::ms_to_duration;
use crate::foundation::error::{RouteCamError, RouteCamResult};

/// Default display refresh rate for preview playback.
pub const DEFAULT_REFRESH_HZ: f64 = 60.0;

/// Source of display refresh ticks for the preview loop.
#[async_trait]
pub trait FrameClock: Send {
    /// Wait for the next refresh and return its timestamp.
    async fn next_frame(&mut self) -> Instant;
}

/// Fixed-rate [`FrameClock`] backed by a tokio interval. Late ticks are skipped, like a display
/// dropping frames, rather than delivered in a burst.
#[derive(Debug)]
pub struct IntervalFrameClock {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalFrameClock {
    pub fn new(refresh_hz: f64) -> RouteCamResult<Self> {
        if !(refresh_hz.is_finite() && refresh_hz > 0.0) {
            return Err(RouteCamError::invalid_input(format!(
                "refresh rate must be positive and finite, got {refresh_hz}"
            )));
        }
        Self::from_period_ms(1000.0 / refresh_hz)
    }

    pub fn from_period_ms(period_ms: f64) -> RouteCamResult<Self> {
        let period = ms_to_duration(period_ms);
        if period.is_zero() {
            return Err(RouteCamError::invalid_input(format!(
                "frame period must be positive, got {period_ms} ms"
            )));
        }
        Ok(Self {
            period,
            interval: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for IntervalFrameClock {
    fn default() -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / DEFAULT_REFRESH_HZ),
            interval: None,
        }
    }
}

#[async_trait]
impl FrameClock for IntervalFrameClock {
    async fn next_frame(&mut self) -> Instant {
        // created lazily so construction does not need a runtime
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut i = tokio::time::interval(period);
            i.set_missed_tick_behavior(MissedTickBehavior::Skip);
            i
        });
        interval.tick().await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/clock.rs"]
mod tests;
