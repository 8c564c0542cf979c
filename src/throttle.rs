//! Leading+trailing throttle.
//!
//! The first call after a quiet period is delivered immediately and opens a
//! window. Calls landing inside the window replace a single pending value,
//! which is delivered when the window ends and opens the next window. A window
//! that ends with nothing pending returns the throttle to quiet.
//!
//! The throttle never reads the clock itself; hosts pass `now` in, and call
//! [`Throttle::poll`] from their tick to flush trailing values on time.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Throttle<T> {
    window: Duration,
    window_end: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            window_end: None,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Offer `value` at `now`; `sink` receives whatever is due
    pub fn call(&mut self, now: Instant, value: T, mut sink: impl FnMut(T)) {
        self.poll(now, &mut sink);

        if self.window_end.is_some() {
            self.pending = Some(value);
        } else {
            self.window_end = Some(now + self.window);
            sink(value);
        }
    }

    /// Deliver a pending trailing value if its window has ended
    pub fn poll(&mut self, now: Instant, mut sink: impl FnMut(T)) {
        while let Some(end) = self.window_end {
            if now < end {
                return;
            }
            match self.pending.take() {
                Some(value) => {
                    self.window_end = Some(end + self.window);
                    sink(value);
                }
                None => self.window_end = None,
            }
        }
    }

    /// Drop any pending value and return to quiet
    pub fn cancel(&mut self) {
        self.pending = None;
        self.window_end = None;
    }

    /// When the pending trailing value is due, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and(self.window_end)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_leading_call_delivers_immediately() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));

        assert_eq!(out, vec![1]);
        assert!(!throttle.has_pending());
    }

    #[test]
    fn test_burst_coalesces_into_one_trailing_value() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));
        throttle.call(ms(t0, 10), 2, |v| out.push(v));
        throttle.call(ms(t0, 20), 3, |v| out.push(v));
        throttle.call(ms(t0, 30), 4, |v| out.push(v));
        assert_eq!(out, vec![1]);
        assert_eq!(throttle.deadline(), Some(ms(t0, 100)));

        throttle.poll(ms(t0, 99), |v| out.push(v));
        assert_eq!(out, vec![1]);

        throttle.poll(ms(t0, 100), |v| out.push(v));
        assert_eq!(out, vec![1, 4]);
    }

    #[test]
    fn test_trailing_delivery_keeps_window_open() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));
        throttle.call(ms(t0, 50), 2, |v| out.push(v));
        throttle.poll(ms(t0, 100), |v| out.push(v));

        // Second window runs 100..200, so this call is held back
        throttle.call(ms(t0, 150), 3, |v| out.push(v));
        assert_eq!(out, vec![1, 2]);

        throttle.poll(ms(t0, 200), |v| out.push(v));
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_quiet_period_reopens_leading_edge() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));
        throttle.poll(ms(t0, 100), |v| out.push(v));
        assert_eq!(throttle.deadline(), None);

        throttle.call(ms(t0, 500), 2, |v| out.push(v));
        assert_eq!(out, vec![1, 2]);
    }

    #[test]
    fn test_call_flushes_overdue_trailing_value_without_poll() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));
        throttle.call(ms(t0, 40), 2, |v| out.push(v));
        throttle.call(ms(t0, 450), 3, |v| out.push(v));

        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let t0 = Instant::now();
        let mut throttle = Throttle::new(WINDOW);
        let mut out = Vec::new();

        throttle.call(t0, 1, |v| out.push(v));
        throttle.call(ms(t0, 10), 2, |v| out.push(v));
        throttle.cancel();
        throttle.poll(ms(t0, 200), |v| out.push(v));

        assert_eq!(out, vec![1]);
        assert!(!throttle.has_pending());
    }
}
