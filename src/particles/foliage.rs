//! Foliage point cloud
//!
//! The needle mass of the tree: a large point set whose chaos/target
//! positions and per-point random scalar are generated once and uploaded
//! once. Blending between the two positions happens in the vertex shader,
//! driven by a single damped progress uniform, so the per-frame CPU cost is
//! independent of the point count. The CPU-side mirrors in this module exist
//! so the morph math stays testable; the shader must match them exactly.

use crate::animation::ProgressDriver;
use crate::config::FoliageConfig;
use crate::geometry::{chaos_position, tree_position, Lcg};
use crate::math::Vec3;

/// Floats per point: chaos(3) + target(3) + random(1)
pub const FOLIAGE_STRIDE: usize = 7;

/// Resolved foliage palette for shader uniforms
#[derive(Debug, Clone, Copy)]
pub struct FoliagePalette {
    pub low: Vec3,
    pub high: Vec3,
    pub sparkle: Vec3,
}

pub struct FoliageField {
    count: usize,
    attributes: Vec<f32>,
    progress: ProgressDriver,
    palette: FoliagePalette,
}

impl FoliageField {
    pub fn new(config: &FoliageConfig, rng: &mut Lcg) -> Result<Self, String> {
        let palette = FoliagePalette {
            low: Vec3::from_hex(&config.color_low)?,
            high: Vec3::from_hex(&config.color_high)?,
            sparkle: Vec3::from_hex(&config.color_sparkle)?,
        };

        let mut attributes = Vec::with_capacity(config.count * FOLIAGE_STRIDE);
        for i in 0..config.count {
            let chaos = chaos_position(rng, config.chaos_radius);
            let target = tree_position(
                rng,
                config.height,
                config.base_radius,
                i,
                config.count,
                config.y_offset,
            );
            attributes.extend_from_slice(&chaos.to_array());
            attributes.extend_from_slice(&target.to_array());
            attributes.push(rng.next_f32());
        }

        Ok(Self {
            count: config.count,
            attributes,
            progress: ProgressDriver::new(config.damp_rate),
            palette,
        })
    }

    /// Advance the shared progress one frame; returns the new value
    pub fn advance(&mut self, formed: bool, dt: f32) -> f32 {
        self.progress.advance(formed, dt)
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn palette(&self) -> &FoliagePalette {
        &self.palette
    }

    /// Interleaved static attributes for one-time GPU upload
    pub fn attribute_data(&self) -> &[f32] {
        &self.attributes
    }

    pub fn chaos(&self, index: usize) -> Vec3 {
        let base = index * FOLIAGE_STRIDE;
        Vec3::new(
            self.attributes[base],
            self.attributes[base + 1],
            self.attributes[base + 2],
        )
    }

    pub fn target(&self, index: usize) -> Vec3 {
        let base = index * FOLIAGE_STRIDE + 3;
        Vec3::new(
            self.attributes[base],
            self.attributes[base + 1],
            self.attributes[base + 2],
        )
    }

    pub fn random(&self, index: usize) -> f32 {
        self.attributes[index * FOLIAGE_STRIDE + 6]
    }

    /// CPU mirror of the shader's position mix
    pub fn blended_position(&self, index: usize, eased: f32) -> Vec3 {
        self.chaos(index).lerp(&self.target(index), eased)
    }

    /// CPU mirror of the shader's wind term; zero whenever `eased` is zero
    pub fn wind_offset(position: Vec3, time: f32, eased: f32) -> Vec3 {
        Vec3::new(
            (time * 2.0 + position.y).sin() * 0.1 * eased,
            0.0,
            (time * 1.5 + position.y).cos() * 0.1 * eased,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::cubic_in_out;

    fn field() -> FoliageField {
        let config = FoliageConfig {
            count: 200,
            ..FoliageConfig::default()
        };
        let mut rng = Lcg::new(42);
        FoliageField::new(&config, &mut rng).unwrap()
    }

    #[test]
    fn test_attribute_layout() {
        let field = field();
        assert_eq!(field.attribute_data().len(), 200 * FOLIAGE_STRIDE);
        for i in 0..field.count() {
            assert!(field.chaos(i).is_finite());
            assert!(field.target(i).is_finite());
            assert!((0.0..1.0).contains(&field.random(i)));
        }
    }

    #[test]
    fn test_blend_reproduces_endpoints_exactly() {
        let field = field();
        for i in [0, 57, 199] {
            assert_eq!(field.blended_position(i, 0.0), field.chaos(i));
            assert_eq!(field.blended_position(i, 1.0), field.target(i));
        }
    }

    #[test]
    fn test_wind_is_zero_in_chaos() {
        let pos = Vec3::new(1.0, 4.0, -2.0);
        for time in [0.0, 1.3, 900.0] {
            assert_eq!(FoliageField::wind_offset(pos, time, 0.0), Vec3::ZERO);
        }
        // And nonzero once formed (generic phase)
        let formed = FoliageField::wind_offset(pos, 1.3, 1.0);
        assert!(formed.x.abs() > 0.0 || formed.z.abs() > 0.0);
        assert_eq!(formed.y, 0.0);
    }

    #[test]
    fn test_progress_advances_with_mode() {
        let mut field = field();
        assert_eq!(field.progress(), 0.0);

        for _ in 0..60 {
            field.advance(true, 1.0 / 60.0);
        }
        let formed = field.progress();
        assert!(formed > 0.5);

        for _ in 0..60 {
            field.advance(false, 1.0 / 60.0);
        }
        assert!(field.progress() < formed);
    }

    #[test]
    fn test_eased_midpoint_is_halfway() {
        let field = field();
        let p = field.blended_position(3, cubic_in_out(0.5));
        let mid = field.chaos(3).lerp(&field.target(3), 0.5);
        assert!(p.distance(&mid) < 0.0001);
    }

    #[test]
    fn test_targets_lie_on_cone() {
        let field = field();
        let config = FoliageConfig::default();
        for i in 0..field.count() {
            let t = field.target(i);
            assert!(t.y <= config.height + config.y_offset + 0.0001);
            assert!(t.y >= config.y_offset - 0.0001);
        }
    }
}
