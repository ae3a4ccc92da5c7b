//! Wrapping countdown used for cooldowns, stagger windows, and animation phase.
//!
//! `step` accumulates elapsed time and, when it passes `length`, subtracts one
//! `length` (keeping the remainder) and reports a timeout. The timed-out flag
//! is sticky: it stays set until `reset()` is called, so callers that only poll
//! `is_timed_out()` observe the first expiry, not the latest one.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    length: f32,
    elapsed: f32,
    timed_out: bool,
}

impl Timer {
    pub const fn new(length: f32) -> Self {
        Self {
            length,
            elapsed: 0.0,
            timed_out: false,
        }
    }

    /// A timer whose elapsed time already sits at `length`, so the next
    /// positive step expires it.
    pub const fn primed(length: f32) -> Self {
        Self {
            length,
            elapsed: length,
            timed_out: false,
        }
    }

    /// Advance by `dt` seconds. Returns true when this step crossed `length`.
    pub fn step(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed > self.length {
            self.elapsed -= self.length;
            self.timed_out = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.timed_out = false;
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_below_length_does_not_time_out() {
        let mut timer = Timer::new(1.0);
        assert!(!timer.step(0.4));
        assert!(!timer.step(0.4));
        assert!(!timer.is_timed_out());
        assert!((timer.elapsed() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn crossing_length_wraps_and_keeps_remainder() {
        let mut timer = Timer::new(1.0);
        timer.step(0.75);
        assert!(timer.step(0.5));
        assert!(timer.is_timed_out());
        // 1.25 - 1.0, not reset to zero
        assert!((timer.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reaching_length_exactly_is_not_a_timeout() {
        let mut timer = Timer::new(0.5);
        assert!(!timer.step(0.5));
        assert!(timer.step(0.001));
    }

    #[test]
    fn two_and_a_half_lengths_cross_twice() {
        let mut timer = Timer::new(0.4);
        let mut crossings = 0;
        // 10 * 0.1 = 2.5 * 0.4
        for _ in 0..10 {
            if timer.step(0.1) {
                crossings += 1;
            }
        }
        assert_eq!(crossings, 2);
        assert!((timer.elapsed() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn timeout_flag_is_sticky_until_reset() {
        let mut timer = Timer::new(0.1);
        assert!(timer.step(0.15));
        assert!(!timer.step(0.01));
        assert!(timer.is_timed_out(), "flag survives a non-expiring step");

        timer.reset();
        assert!(!timer.is_timed_out());
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn primed_timer_expires_on_first_positive_step() {
        let mut timer = Timer::primed(0.7);
        assert!(!timer.is_timed_out());
        assert!(timer.step(0.016));
        assert!((timer.elapsed() - 0.016).abs() < 1e-5);
    }
}
