//! Clock-driven debouncing
//!
//! The caller passes the current [`Instant`] in, so coalescing is
//! deterministic and needs no timer thread.

use std::time::{Duration, Instant};

/// Last-write-wins debouncer
///
/// Every [`schedule`](Debouncer::schedule) pushes the deadline out by the
/// full delay; [`fire_if_due`](Debouncer::fire_if_due) reports the deadline
/// once it has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the quiet period at `now`
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the deadline has passed, clear it and return true
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(start);
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(499)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_reschedule_extends_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(400));
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(600)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));

        assert!(!debouncer.cancel());
        debouncer.schedule(start);
        assert!(debouncer.cancel());
        assert!(!debouncer.fire_if_due(start + Duration::from_secs(1)));
    }
}
