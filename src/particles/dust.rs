//! Ambient gold dust
//!
//! A small instanced cloud drifting through the whole volume. Particles
//! inside the attraction radius of the cursor (pointer or hand, projected
//! into the scene) pick up velocity toward it; accumulated velocity decays
//! every frame while the base drift never does. The cloud ignores the group
//! rotation and wraps at a fixed cubic boundary.

use crate::config::DustConfig;
use crate::geometry::Lcg;
use crate::math::{Mat4, Vec3};

/// Shared shimmer rotation advance per frame, radians
const SHIMMER_STEP: f32 = 0.01;
/// Per-index phase spread so instances never tumble in lockstep
const SHIMMER_PHASE: f32 = 0.618;

#[derive(Debug, Clone)]
struct DustParticle {
    position: Vec3,
    velocity: Vec3,
    base_velocity: Vec3,
    scale: f32,
}

pub struct DustField {
    particles: Vec<DustParticle>,
    attraction_radius: f32,
    attraction_strength: f32,
    velocity_damping: f32,
    wrap_range: f32,
    shimmer: f32,
    color: Vec3,
    emissive: Vec3,
    transforms: Vec<f32>,
    dirty: bool,
}

impl DustField {
    pub fn new(config: &DustConfig, rng: &mut Lcg) -> Result<Self, String> {
        let mut particles = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            particles.push(DustParticle {
                position: Vec3::new(
                    rng.range(-0.5, 0.5) * config.spawn_extent_xy,
                    rng.range(-0.5, 0.5) * config.spawn_extent_xy,
                    rng.range(-0.5, 0.5) * config.spawn_extent_z,
                ),
                velocity: Vec3::ZERO,
                base_velocity: Vec3::new(
                    rng.range(-config.drift, config.drift),
                    rng.range(-config.drift, config.drift),
                    rng.range(-config.drift, config.drift),
                ),
                scale: config.scale_min + rng.next_f32() * config.scale_range,
            });
        }

        Ok(Self {
            transforms: vec![0.0; config.count * 16],
            particles,
            attraction_radius: config.attraction_radius,
            attraction_strength: config.attraction_strength,
            velocity_damping: config.velocity_damping,
            wrap_range: config.wrap_range,
            shimmer: 0.0,
            color: Vec3::from_hex(&config.color)?,
            emissive: Vec3::from_hex(&config.emissive)?,
            dirty: true,
        })
    }

    /// Advance one frame; `attractor` is the cursor projected to world space
    pub fn update(&mut self, attractor: Vec3) {
        self.shimmer += SHIMMER_STEP;
        let range = self.wrap_range;

        for (i, p) in self.particles.iter_mut().enumerate() {
            let dist = p.position.distance(&attractor);
            if dist < self.attraction_radius {
                let pull = (attractor - p.position).normalize();
                let force = (self.attraction_radius - dist) * self.attraction_strength;
                p.velocity += pull.scale(force);
            }

            p.position += p.base_velocity;
            p.position += p.velocity;
            p.velocity = p.velocity.scale(self.velocity_damping);

            p.position.x = wrap(p.position.x, range);
            p.position.y = wrap(p.position.y, range);
            p.position.z = wrap(p.position.z, range);

            let angle = self.shimmer + i as f32 * SHIMMER_PHASE;
            Mat4::trs(p.position, angle, angle * 0.8, 0.0, p.scale)
                .write_to(&mut self.transforms[i * 16..(i + 1) * 16]);
        }

        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn emissive(&self) -> Vec3 {
        self.emissive
    }

    pub fn transform_data(&self) -> &[f32] {
        &self.transforms
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    #[cfg(test)]
    fn position(&self, i: usize) -> Vec3 {
        self.particles[i].position
    }

    #[cfg(test)]
    fn velocity(&self, i: usize) -> Vec3 {
        self.particles[i].velocity
    }

    #[cfg(test)]
    fn base_velocity(&self, i: usize) -> Vec3 {
        self.particles[i].base_velocity
    }
}

/// Teleport to the opposite face of the cubic boundary
fn wrap(v: f32, range: f32) -> f32 {
    if v > range {
        -range
    } else if v < -range {
        range
    } else {
        v
    }
}
