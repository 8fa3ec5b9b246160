//! Apex star
//!
//! A single emissive ornament crowning the tree. It follows the same
//! chaos/target morph as everything else but with its own damped progress,
//! a continuous spin, and a gentle metronome sway.

use crate::animation::{cubic_in_out, ProgressDriver};
use crate::config::StarConfig;
use crate::geometry::{chaos_position, Lcg};
use crate::math::{Mat4, Vec3};

/// Star spin about the vertical axis, radians per second
const SPIN_RATE: f32 = 1.0;
/// Sway amplitude, radians
const SWAY: f32 = 0.1;

pub struct TopStar {
    chaos: Vec3,
    target: Vec3,
    progress: ProgressDriver,
    spin: f32,
    scale_min: f32,
    scale_max: f32,
    color: Vec3,
    matrix: Mat4,
}

impl TopStar {
    pub fn new(config: &StarConfig, rng: &mut Lcg) -> Result<Self, String> {
        Ok(Self {
            chaos: chaos_position(rng, config.chaos_radius),
            target: Vec3::new(0.0, config.apex_height, 0.0),
            progress: ProgressDriver::new(config.damp_rate),
            spin: 0.0,
            scale_min: config.scale_min,
            scale_max: config.scale_max,
            color: Vec3::from_hex(&config.color)?,
            matrix: Mat4::identity(),
        })
    }

    /// Advance one frame; `time` is the scene clock for the sway phase
    pub fn update(&mut self, formed: bool, dt: f32, time: f32) {
        self.spin += dt * SPIN_RATE;
        let eased = cubic_in_out(self.progress.advance(formed, dt));

        let position = self.chaos.lerp(&self.target, eased);
        let roll = (time * 2.0).sin() * SWAY;
        let scale = self.scale_min + (self.scale_max - self.scale_min) * eased;

        self.matrix = Mat4::trs(position, self.spin, 0.0, roll, scale);
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    #[cfg(test)]
    fn position(&self) -> Vec3 {
        let m = self.matrix.as_slice();
        Vec3::new(m[12], m[13], m[14])
    }
}
