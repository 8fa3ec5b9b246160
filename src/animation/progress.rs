//! Frame-rate-independent progress damping
//!
//! Every animated group owns a [`ProgressDriver`]: a scalar in [0, 1] pulled
//! toward 1 (formed) or 0 (chaos) by exponential damping. Heavier ornament
//! categories use a lower rate, which is what produces the lag-by-weight
//! illusion during the morph.

/// Exponential damping of `current` toward `target`.
///
/// Equivalent to `lerp(current, target, 1 - exp(-rate * dt))`: iterating it
/// at any frame cadence covering the same wall-clock time lands on the same
/// value.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Per-group animation progress, damped toward the active scene mode.
#[derive(Debug, Clone)]
pub struct ProgressDriver {
    value: f32,
    rate: f32,
}

impl ProgressDriver {
    pub fn new(rate: f32) -> Self {
        Self { value: 0.0, rate }
    }

    /// Advance one frame toward 1.0 (formed) or 0.0 (chaos)
    pub fn advance(&mut self, formed: bool, dt: f32) -> f32 {
        let target = if formed { 1.0 } else { 0.0 };
        self.value = damp(self.value, target, self.rate, dt).clamp(0.0, 1.0);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump to an explicit progress value (used for instant state setup)
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damp_converges_without_overshoot() {
        let mut v = 0.0;
        let mut prev = v;
        for _ in 0..600 {
            v = damp(v, 1.0, 1.5, 1.0 / 60.0);
            assert!(v >= prev);
            assert!(v <= 1.0);
            prev = v;
        }
        assert!(v > 0.999);
    }

    #[test]
    fn test_damp_frame_rate_independent() {
        // Same wall-clock time, different step counts, same landing point
        let mut coarse = 0.0;
        coarse = damp(coarse, 1.0, 1.5, 1.0);

        let mut fine = 0.0;
        for _ in 0..100 {
            fine = damp(fine, 1.0, 1.5, 0.01);
        }

        assert!((coarse - fine).abs() < 0.0001);
    }

    #[test]
    fn test_driver_direction_switch() {
        let mut driver = ProgressDriver::new(2.0);
        for _ in 0..120 {
            driver.advance(true, 1.0 / 60.0);
        }
        let formed = driver.value();
        assert!(formed > 0.9);

        driver.advance(false, 1.0 / 60.0);
        assert!(driver.value() < formed);
    }

    #[test]
    fn test_driver_stays_in_unit_interval() {
        let mut driver = ProgressDriver::new(10.0);
        for _ in 0..1000 {
            let v = driver.advance(true, 0.1);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_higher_rate_converges_faster() {
        let mut slow = ProgressDriver::new(1.0);
        let mut fast = ProgressDriver::new(4.0);
        for _ in 0..30 {
            slow.advance(true, 1.0 / 60.0);
            fast.advance(true, 1.0 / 60.0);
        }
        assert!(fast.value() > slow.value());
    }
}
