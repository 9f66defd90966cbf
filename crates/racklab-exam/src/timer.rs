//! Polled countdown timer for exam sessions.
//!
//! Driven by an external tick source -- no OS thread, no timer handle to
//! leak. Stopping is idempotent and a stopped timer can be restarted.

use std::time::{Duration, Instant};

/// Snapshot returned by each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerStatus {
    pub running: bool,
    pub remaining: Duration,
    /// Whether the deadline has passed. Latched until the next start.
    pub expired: bool,
}

/// Wall-clock exam countdown. Owns no scoring logic.
pub struct ExamTimer {
    duration: Duration,
    deadline: Option<Instant>,
    expired: bool,
    on_expiry: Option<Box<dyn FnMut()>>,
}

impl ExamTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
            expired: false,
            on_expiry: None,
        }
    }

    /// Install the expiry callback. Fired at most once per `start`.
    pub fn set_on_expiry(&mut self, callback: impl FnMut() + 'static) {
        self.on_expiry = Some(Box::new(callback));
    }

    /// Begin (or restart) the countdown from `now`. Clears any previous
    /// expiry latch.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.duration);
        self.expired = false;
    }

    /// Stop the countdown. Idempotent; the expiry latch is preserved so a
    /// caller can still observe that time ran out.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Advance the timer to `now`. Fires the expiry callback on the first
    /// tick at or past the deadline, then stops.
    pub fn tick(&mut self, now: Instant) -> TimerStatus {
        let Some(deadline) = self.deadline else {
            return TimerStatus {
                running: false,
                remaining: Duration::ZERO,
                expired: self.expired,
            };
        };

        if now >= deadline {
            self.deadline = None;
            self.expired = true;
            if let Some(callback) = self.on_expiry.as_mut() {
                callback();
            }
            return TimerStatus {
                running: false,
                remaining: Duration::ZERO,
                expired: true,
            };
        }

        TimerStatus {
            running: true,
            remaining: deadline - now,
            expired: false,
        }
    }
}
