//! Fixed-duration height interpolation against an explicit clock. The engine
//! tick samples values and observes completion; nothing runs in the
//! background.

use std::time::{Duration, Instant};

/// Eased interpolation from one height to another. Completion is observed by
/// polling, so the completion "callback" is whatever the state machine does
/// when `is_complete` first reports true.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeightAnimation {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
}

impl HeightAnimation {
    #[must_use]
    pub(crate) fn new(from: f32, to: f32, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Retarget the end height mid-flight, keeping the clock. Used when host
    /// metrics change under a presenting banner.
    pub(crate) fn retarget(&mut self, to: f32) {
        self.to = to;
    }

    #[must_use]
    pub(crate) fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    /// Height at `now`, ease-out so transitions start fast and settle gently.
    #[must_use]
    pub(crate) fn value_at(&self, now: Instant) -> f32 {
        if self.is_complete(now) {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}
