//! Instanced ornament groups
//!
//! Boxes, balls, lights, and emerald gems are four instances of one
//! parameterized group. Each group owns its damped progress (heavier
//! categories damp slower, so they trail the morph), a fixed record array
//! generated at construction, and a CPU-resident transform buffer rebuilt
//! every frame and uploaded to the GPU in a single call.

use crate::animation::{cubic_in_out, ProgressDriver};
use crate::config::{FoliageConfig, OrnamentTuning, SceneConfig};
use crate::geometry::{chaos_position, tree_position, Lcg};
use crate::math::{Mat4, Vec3};

/// Continuous ornament spin about the vertical axis, radians per second
const SPIN_RATE: f32 = 0.5;
/// Ornaments grow from 80% to full size as the tree forms
const SHRUNK_SCALE: f32 = 0.8;

/// Ornament category; decides geometry and material treatment downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    Box,
    Ball,
    Light,
    Emerald,
}

/// Immutable per-instance source data, fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct DualPosition {
    pub chaos: Vec3,
    pub target: Vec3,
    pub scale: f32,
    /// Initial x/z tilt, eased back to upright as the tree forms
    pub tilt: Vec3,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct OrnamentRecord {
    pub placement: DualPosition,
    pub kind: OrnamentKind,
    pub mass: f32,
}

/// Everything one group needs, resolved from [`OrnamentTuning`]
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub kind: OrnamentKind,
    pub count: usize,
    pub damp_rate: f32,
    pub mass: f32,
    pub chaos_radius: f32,
    pub base_radius: f32,
    pub radial_push: f32,
    pub scale_min: f32,
    pub scale_range: f32,
    /// Primary/secondary carry any emissive boost pre-multiplied
    pub primary: Vec3,
    pub secondary: Vec3,
    pub primary_weight: f32,
    /// Cone the targets are sampled on (shared with the foliage)
    pub cone_height: f32,
    pub cone_y_offset: f32,
    /// Index space of the foliage surface the targets sample into
    pub surface_total: usize,
}

impl GroupConfig {
    pub fn resolve(
        kind: OrnamentKind,
        tuning: &OrnamentTuning,
        foliage: &FoliageConfig,
    ) -> Result<Self, String> {
        Ok(Self {
            kind,
            count: tuning.count,
            damp_rate: tuning.damp_rate,
            mass: tuning.mass,
            chaos_radius: 25.0,
            base_radius: tuning.base_radius,
            radial_push: tuning.radial_push,
            scale_min: tuning.scale_min,
            scale_range: tuning.scale_range,
            primary: Vec3::from_hex(&tuning.primary)?.scale(tuning.emissive_boost),
            secondary: Vec3::from_hex(&tuning.secondary)?.scale(tuning.emissive_boost),
            primary_weight: tuning.primary_weight,
            cone_height: foliage.height,
            cone_y_offset: foliage.y_offset,
            surface_total: foliage.count,
        })
    }
}

pub struct OrnamentGroup {
    kind: OrnamentKind,
    records: Vec<OrnamentRecord>,
    progress: ProgressDriver,
    spin: f32,
    transforms: Vec<f32>,
    colors: Vec<f32>,
    dirty: bool,
}

impl OrnamentGroup {
    pub fn new(config: &GroupConfig, rng: &mut Lcg) -> Self {
        let mut records = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count * 3);

        for i in 0..config.count {
            // Scatter instances over the whole surface-index space, with a
            // random local offset so rings of same-kind ornaments never form
            let stagger = config.surface_total / config.count;
            let surface_index = (rng.next_f32() * 1000.0) as usize + i * stagger;

            let mut target = tree_position(
                rng,
                config.cone_height,
                config.base_radius,
                surface_index,
                config.surface_total,
                config.cone_y_offset,
            );
            // Nudge onto (push > 1) or into (push < 1) the foliage shell
            target.x *= config.radial_push;
            target.z *= config.radial_push;

            let color = if rng.next_f32() < config.primary_weight {
                config.primary
            } else {
                config.secondary
            };
            colors.extend_from_slice(&color.to_array());

            records.push(OrnamentRecord {
                placement: DualPosition {
                    chaos: chaos_position(rng, config.chaos_radius),
                    target,
                    scale: config.scale_min + rng.next_f32() * config.scale_range,
                    tilt: Vec3::new(
                        rng.next_f32() * std::f32::consts::PI,
                        rng.next_f32() * std::f32::consts::PI,
                        0.0,
                    ),
                    color,
                },
                kind: config.kind,
                mass: config.mass,
            });
        }

        Self {
            kind: config.kind,
            transforms: vec![0.0; config.count * 16],
            colors,
            records,
            progress: ProgressDriver::new(config.damp_rate),
            spin: 0.0,
            dirty: true,
        }
    }

    /// Advance the group one frame and rebuild the instance transforms
    pub fn update(&mut self, formed: bool, dt: f32) {
        self.spin += dt * SPIN_RATE;
        let eased = cubic_in_out(self.progress.advance(formed, dt));

        for (i, record) in self.records.iter().enumerate() {
            let p = &record.placement;
            let position = p.chaos.lerp(&p.target, eased);

            // Face away from the trunk axis, then keep turning slowly
            let yaw = position.x.atan2(position.z) + self.spin;
            let pitch = p.tilt.x * (1.0 - eased);
            let roll = p.tilt.y * (1.0 - eased);
            let scale = p.scale * (SHRUNK_SCALE + (1.0 - SHRUNK_SCALE) * eased);

            Mat4::trs(position, yaw, pitch, roll, scale)
                .write_to(&mut self.transforms[i * 16..(i + 1) * 16]);
        }

        self.dirty = true;
    }

    pub fn kind(&self) -> OrnamentKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn records(&self) -> &[OrnamentRecord] {
        &self.records
    }

    /// Per-instance column-major matrices, 16 floats each
    pub fn transform_data(&self) -> &[f32] {
        &self.transforms
    }

    /// Per-instance RGB, written once at construction
    pub fn color_data(&self) -> &[f32] {
        &self.colors
    }

    /// True when the transform buffer changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }
}

/// The four configured groups, updated as one unit
pub struct OrnamentSet {
    groups: Vec<OrnamentGroup>,
}

impl OrnamentSet {
    pub fn new(config: &SceneConfig, rng: &mut Lcg) -> Result<Self, String> {
        let mut groups = Vec::with_capacity(4);
        for (kind, tuning) in [
            (OrnamentKind::Box, &config.boxes),
            (OrnamentKind::Ball, &config.balls),
            (OrnamentKind::Light, &config.lights),
            (OrnamentKind::Emerald, &config.emeralds),
        ] {
            let group_config = GroupConfig::resolve(kind, tuning, &config.foliage)?;
            groups.push(OrnamentGroup::new(&group_config, rng));
        }
        Ok(Self { groups })
    }

    pub fn update(&mut self, formed: bool, dt: f32) {
        for group in &mut self.groups {
            group.update(formed, dt);
        }
    }

    pub fn groups(&self) -> &[OrnamentGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [OrnamentGroup] {
        &mut self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(kind: OrnamentKind) -> OrnamentGroup {
        let config = SceneConfig::default();
        let tuning = match kind {
            OrnamentKind::Box => &config.boxes,
            OrnamentKind::Ball => &config.balls,
            OrnamentKind::Light => &config.lights,
            OrnamentKind::Emerald => &config.emeralds,
        };
        let group_config = GroupConfig::resolve(kind, tuning, &config.foliage).unwrap();
        let mut rng = Lcg::new(42);
        OrnamentGroup::new(&group_config, &mut rng)
    }

    fn translation_of(group: &OrnamentGroup, i: usize) -> Vec3 {
        let m = &group.transform_data()[i * 16..(i + 1) * 16];
        Vec3::new(m[12], m[13], m[14])
    }

    #[test]
    fn test_buffer_sizes() {
        let g = group(OrnamentKind::Ball);
        assert_eq!(g.len(), 300);
        assert_eq!(g.transform_data().len(), 300 * 16);
        assert_eq!(g.color_data().len(), 300 * 3);
    }

    #[test]
    fn test_chaos_state_places_instances_at_chaos() {
        let mut g = group(OrnamentKind::Box);
        g.update(false, 1.0 / 60.0);
        for i in [0, 42, 99] {
            let t = translation_of(&g, i);
            assert!(t.distance(&g.records()[i].placement.chaos) < 0.0001);
        }
    }

    #[test]
    fn test_formed_state_converges_to_target() {
        let mut g = group(OrnamentKind::Light);
        for _ in 0..600 {
            g.update(true, 1.0 / 60.0);
        }
        for i in [0, 100, 599] {
            let t = translation_of(&g, i);
            assert!(t.distance(&g.records()[i].placement.target) < 0.01);
        }
    }

    #[test]
    fn test_lighter_categories_lead_the_morph() {
        let mut boxes = group(OrnamentKind::Box);
        let mut lights = group(OrnamentKind::Light);
        for _ in 0..30 {
            boxes.update(true, 1.0 / 60.0);
            lights.update(true, 1.0 / 60.0);
        }
        assert!(lights.progress() > boxes.progress());
    }

    #[test]
    fn test_emeralds_sit_inside_the_shell() {
        let g = group(OrnamentKind::Emerald);
        let config = SceneConfig::default();
        // Inward push: every target radius is under the unpushed cone radius
        for record in g.records() {
            let radial = (record.placement.target.x.powi(2)
                + record.placement.target.z.powi(2))
            .sqrt();
            let cone_height = config.foliage.height;
            let local_height = record.placement.target.y - config.foliage.y_offset;
            let cone_radius_here =
                config.emeralds.base_radius * (1.0 - local_height / cone_height);
            // Jitter (±0.25 per axis) plus the 0.95 pull keeps it at or below
            assert!(radial <= cone_radius_here.mul_add(0.95, 0.5).max(0.5));
        }
    }

    #[test]
    fn test_dirty_flag_cycle() {
        let mut g = group(OrnamentKind::Ball);
        assert!(g.is_dirty());
        g.mark_uploaded();
        assert!(!g.is_dirty());
        g.update(true, 1.0 / 60.0);
        assert!(g.is_dirty());
    }

    #[test]
    fn test_light_colors_are_boosted_uniform() {
        let g = group(OrnamentKind::Light);
        let expected = Vec3::from_hex("#fffbeb").unwrap().scale(2.0);
        for rgb in g.color_data().chunks(3) {
            assert!((rgb[0] - expected.x).abs() < 0.0001);
            assert!((rgb[1] - expected.y).abs() < 0.0001);
            assert!((rgb[2] - expected.z).abs() < 0.0001);
        }
    }

    #[test]
    fn test_box_colors_follow_weighting() {
        let g = group(OrnamentKind::Box);
        let primary = Vec3::from_hex("#d97706").unwrap();
        let mut primary_count = 0;
        for rgb in g.color_data().chunks(3) {
            if (rgb[0] - primary.x).abs() < 0.0001 {
                primary_count += 1;
            }
        }
        // 70% weighting over 100 instances; allow sampling slack
        assert!((55..=85).contains(&primary_count));
    }

    #[test]
    fn test_set_builds_all_four_groups() {
        let config = SceneConfig::default();
        let mut rng = Lcg::new(7);
        let set = OrnamentSet::new(&config, &mut rng).unwrap();
        assert_eq!(set.groups().len(), 4);
        let total: usize = set.groups().iter().map(OrnamentGroup::len).sum();
        assert_eq!(total, 100 + 300 + 600 + 700);
    }
}
