//! Scatter and tree-surface position sampling
//!
//! Every particle and ornament in the scene carries two positions fixed at
//! creation: a scattered "chaos" point inside a sphere and an assembled
//! "target" point on the spiral cone that forms the tree silhouette.

use std::f32::consts::TAU;

use crate::math::Vec3;

/// Deterministic linear congruential generator seeding all scene randomness.
/// Numerical-recipes constants; high bits are taken for the mantissa.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next sample in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.state >> 8) as f32 / 16_777_216.0
    }

    /// Uniform sample in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Uniform random point inside a sphere of the given radius.
///
/// Radial distance uses cube-root sampling so density is volumetric-uniform
/// (plain `r = radius * U` would cluster points near the center).
pub fn chaos_position(rng: &mut Lcg, radius: f32) -> Vec3 {
    debug_assert!(radius.is_finite());

    let theta = TAU * rng.next_f32();
    let phi = (2.0 * rng.next_f32() - 1.0).acos();
    let r = rng.next_f32().cbrt() * radius;

    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Map a linear index onto the lateral surface of a spiral cone.
///
/// Radial progress uses `sqrt(index/total)` so point density is uniform over
/// the cone surface: the widening base gets proportionally more points than
/// the apex. The angle advances a fixed half radian per index, producing a
/// tight spiral, and a ±0.25 jitter on x/z keeps the surface organic.
pub fn tree_position(
    rng: &mut Lcg,
    height: f32,
    base_radius: f32,
    index: usize,
    total: usize,
    y_offset: f32,
) -> Vec3 {
    debug_assert!(height.is_finite() && base_radius.is_finite() && y_offset.is_finite());
    debug_assert!(total > 0);

    let ratio = (index as f32 / total as f32).sqrt();

    // h runs 0 (apex) to height (base); y therefore runs top-down
    let h = height * ratio;
    let y = height - h + y_offset;
    let r = base_radius * (h / height);

    let angle = index as f32 * 0.5;

    Vec3::new(
        angle.cos() * r + rng.range(-0.25, 0.25),
        y,
        angle.sin() * r + rng.range(-0.25, 0.25),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_deterministic() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_lcg_unit_interval() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_chaos_position_stays_inside_sphere() {
        let mut rng = Lcg::new(1);
        for _ in 0..2000 {
            let p = chaos_position(&mut rng, 15.0);
            assert!(p.length() <= 15.0001);
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_chaos_position_volumetric_uniformity() {
        // For a uniform ball, P(r < R/2) = 1/8 and E[r] = 3R/4. A naive
        // linear radius would give P(r < R/2) = 1/2 — far outside the band.
        let mut rng = Lcg::new(1234);
        let radius = 15.0;
        let n = 20_000;

        let mut inner = 0usize;
        let mut sum_r = 0.0f64;
        for _ in 0..n {
            let r = chaos_position(&mut rng, radius).length();
            if r < radius / 2.0 {
                inner += 1;
            }
            sum_r += f64::from(r);
        }

        let inner_fraction = inner as f64 / n as f64;
        assert!(
            (0.105..0.145).contains(&inner_fraction),
            "inner-half fraction {} should be near 1/8",
            inner_fraction
        );

        let mean_r = sum_r / n as f64 / f64::from(radius);
        assert!(
            (0.72..0.78).contains(&mean_r),
            "mean radius fraction {} should be near 3/4",
            mean_r
        );
    }

    #[test]
    fn test_tree_position_apex() {
        let mut rng = Lcg::new(9);
        let p = tree_position(&mut rng, 14.0, 6.0, 0, 15000, 0.0);
        assert_eq!(p.y, 14.0);
        // Only jitter contributes radially at the apex
        let radial = (p.x * p.x + p.z * p.z).sqrt();
        assert!(radial <= 0.36);
    }

    #[test]
    fn test_tree_position_base() {
        let mut rng = Lcg::new(9);
        let total = 15000;
        let p = tree_position(&mut rng, 14.0, 6.0, total, total, 0.0);
        assert!(p.y.abs() < 0.0001);
        let radial = (p.x * p.x + p.z * p.z).sqrt();
        assert!((radial - 6.0).abs() <= 0.5);
    }

    #[test]
    fn test_tree_position_y_offset_shifts_vertically() {
        let mut a = Lcg::new(3);
        let mut b = Lcg::new(3);
        let p0 = tree_position(&mut a, 14.0, 6.0, 500, 15000, 0.0);
        let p1 = tree_position(&mut b, 14.0, 6.0, 500, 15000, -6.0);
        assert!((p0.y - p1.y - 6.0).abs() < 0.0001);
        assert_eq!(p0.x, p1.x);
        assert_eq!(p0.z, p1.z);
    }

    #[test]
    fn test_tree_position_monotone_descent() {
        // Later indices sit lower on the cone
        let mut rng = Lcg::new(5);
        let mut prev_y = f32::MAX;
        for idx in (0..15000).step_by(1500) {
            let p = tree_position(&mut rng, 14.0, 6.0, idx, 15000, -6.0);
            assert!(p.y < prev_y || idx == 0);
            prev_y = p.y;
        }
    }
}
