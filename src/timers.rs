//! Cooperative deferral on a host-driven clock.
//!
//! Nothing here reads the wall clock. The owner passes the current time (ms)
//! in, usually from a `tick(now_ms)` call made by the host's event loop, so
//! deferred work stays deterministic under test.

/// A single pending deadline. Re-arming replaces the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deferred {
    deadline: Option<f64>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline = Some(now_ms + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// True (and disarmed) once `now_ms` reaches the deadline.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Holds the latest value until it has been quiet for `delay_ms`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<T>,
    timer: Deferred,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
            timer: Deferred::new(),
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now_ms: f64) {
        self.pending = Some(value);
        self.timer.arm(now_ms, self.delay_ms);
    }

    /// The pending value, once the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        if self.timer.fire(now_ms) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.timer.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_fires_once() {
        let mut d = Deferred::new();
        d.arm(100.0, 50.0);
        assert!(!d.fire(149.0));
        assert!(d.fire(150.0));
        assert!(!d.fire(200.0));
        assert!(!d.is_armed());
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut d = Deferred::new();
        d.arm(0.0, 100.0);
        d.arm(80.0, 100.0);
        assert_eq!(d.deadline(), Some(180.0));
        assert!(!d.fire(120.0));
    }

    #[test]
    fn test_debouncer_last_write_wins() {
        let mut deb = Debouncer::new(300.0);
        deb.push("a", 0.0);
        deb.push("ab", 200.0);
        assert_eq!(deb.poll(400.0), None);
        assert_eq!(deb.poll(500.0), Some("ab"));
        assert_eq!(deb.poll(900.0), None);
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut deb = Debouncer::new(10.0);
        deb.push(1, 0.0);
        deb.cancel();
        assert!(!deb.is_pending());
        assert_eq!(deb.poll(100.0), None);
    }
}
