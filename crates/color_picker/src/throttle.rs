use instant::Instant;
use std::time::Duration;

/// Coalesces a burst of values into one delivery per interval.
///
/// The first value after a quiet period opens a window of `interval`. Values
/// pushed while the window is open replace the pending one. Once `poll` is
/// called at or after the deadline, the latest value is returned and the
/// window closes. Time is passed in by the caller, the throttle owns no timer
/// thread.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Store `value` as the latest one, opening a window if none is open.
    pub fn push(&mut self, value: T, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + self.interval);
        }
        self.pending = Some(value);
    }

    /// Take the pending value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value and close the window.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }
}
