//! One-shot auto-dismiss deadline, polled from the engine tick.

use std::time::{Duration, Instant};

/// Single-shot deadline with at most one pending fire. Re-arming replaces
/// the previous deadline; `cancel` is idempotent and safe after firing.
#[derive(Debug, Default)]
pub(crate) struct DismissTimer {
    deadline: Option<Instant>,
}

impl DismissTimer {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer `duration` from `now`, replacing any prior deadline.
    pub(crate) fn schedule(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Report the deadline once when due, then disarm.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
