//! Quiet-window debouncing driven by the host's tick.

use std::time::{Duration, Instant};

/// Coalesces a burst of edits into a single trigger once input stops for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Idle debouncer with the given quiet window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an edit, restarting the quiet window.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once when the quiet window has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending trigger.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// An edit is waiting for its quiet window.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_edits_coalesce_into_one_fire() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));

        for step in 0..5 {
            let now = start + Duration::from_millis(step * 300);
            debouncer.touch(now);
            assert!(!debouncer.fire(now + Duration::from_millis(250)));
        }

        let last_edit = start + Duration::from_millis(1200);
        assert!(!debouncer.fire(last_edit + Duration::from_millis(999)));
        assert!(debouncer.fire(last_edit + Duration::from_millis(1000)));
        assert!(!debouncer.fire(last_edit + Duration::from_millis(5000)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_discards_pending_fire() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.touch(start);
        debouncer.cancel();
        assert!(!debouncer.fire(start + Duration::from_secs(1)));
    }
}
