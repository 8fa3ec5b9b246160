//! Scene state
//!
//! Everything that animates, composed behind one `advance` call and kept
//! free of renderer types so the whole update path runs in native tests.
//! The wasm layer owns a [`SceneState`] plus the WebGL pipeline and nothing
//! else.

use crate::config::SceneConfig;
use crate::geometry::Lcg;
use crate::interaction::{FrameInput, InteractionState, PointerState, RotationController};
use crate::math::Vec3;
use crate::particles::{DustField, FoliageField, OrnamentSet, TopStar};
use crate::render::Camera;

/// Per-frame results the render layer consumes
#[derive(Debug, Clone, Copy)]
pub struct FrameSummary {
    pub rotation: f32,
    pub foliage_progress: f32,
    /// The active cursor projected onto the scene plane
    pub cursor_world: Vec3,
}

pub struct SceneState {
    pub foliage: FoliageField,
    pub ornaments: OrnamentSet,
    pub dust: DustField,
    pub star: TopStar,
    pub interaction: InteractionState,
    pub pointer: PointerState,
    rotation: RotationController,
    formed: bool,
    time: f32,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Result<Self, String> {
        config.validate()?;

        let mut rng = Lcg::new(config.seed);
        let foliage = FoliageField::new(&config.foliage, &mut rng)?;
        let ornaments = OrnamentSet::new(config, &mut rng)?;
        let dust = DustField::new(&config.dust, &mut rng)?;
        let star = TopStar::new(&config.star, &mut rng)?;

        Ok(Self {
            foliage,
            ornaments,
            dust,
            star,
            interaction: InteractionState::default(),
            pointer: PointerState::default(),
            rotation: RotationController::new(),
            // The scene opens assembled; progress damps up from chaos
            formed: true,
            time: 0.0,
        })
    }

    /// Advance the whole scene by one frame
    pub fn advance(&mut self, dt: f32, camera: &Camera) -> FrameSummary {
        self.time += dt;

        let input = FrameInput::resolve(&self.interaction, &self.pointer);
        let rotation = self.rotation.update(&input);

        self.foliage.advance(self.formed, dt);
        self.ornaments.update(self.formed, dt);
        self.star.update(self.formed, dt, self.time);

        let cursor_world = camera.unproject_to_plane(input.x, input.y, 0.0);
        self.dust.update(cursor_world);

        FrameSummary {
            rotation,
            foliage_progress: self.foliage.progress(),
            cursor_world,
        }
    }

    pub fn set_formed(&mut self, formed: bool) {
        self.formed = formed;
    }

    pub fn toggle_formed(&mut self) -> bool {
        self.formed = !self.formed;
        self.formed
    }

    pub fn is_formed(&self) -> bool {
        self.formed
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn rotation(&self) -> f32 {
        self.rotation.rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn scene() -> SceneState {
        SceneState::new(&SceneConfig::default()).unwrap()
    }

    fn camera() -> Camera {
        Camera::framed(800, 600)
    }

    #[test]
    fn test_opens_assembling_from_chaos() {
        let mut scene = scene();
        let camera = camera();
        assert!(scene.is_formed());
        assert_eq!(scene.foliage.progress(), 0.0);

        let mut last = 0.0;
        for _ in 0..120 {
            last = scene.advance(DT, &camera).foliage_progress;
        }
        assert!(last > 0.8);
    }

    #[test]
    fn test_toggle_reverses_the_morph() {
        let mut scene = scene();
        let camera = camera();
        for _ in 0..120 {
            scene.advance(DT, &camera);
        }
        let formed = scene.foliage.progress();

        assert!(!scene.toggle_formed());
        for _ in 0..30 {
            scene.advance(DT, &camera);
        }
        assert!(scene.foliage.progress() < formed);
    }

    #[test]
    fn test_all_groups_share_the_mode() {
        let mut scene = scene();
        let camera = camera();
        scene.set_formed(true);
        for _ in 0..240 {
            scene.advance(DT, &camera);
        }
        assert!(scene.foliage.progress() > 0.9);
        assert!(scene.star.progress() > 0.9);
        for group in scene.ornaments.groups() {
            assert!(group.progress() > 0.8);
        }
    }

    #[test]
    fn test_idle_scene_still_spins() {
        let mut scene = scene();
        let camera = camera();
        let r0 = scene.advance(DT, &camera).rotation;
        let r1 = scene.advance(DT, &camera).rotation;
        assert!(r1 > r0);
    }

    #[test]
    fn test_hand_loss_switches_cursor_next_frame() {
        let mut scene = scene();
        let camera = camera();
        scene.pointer.set(-0.8, 0.0);
        scene.interaction.set_hand(0.8, 0.0, false, true);

        let with_hand = scene.advance(DT, &camera);
        assert!(with_hand.cursor_world.x > 0.0);

        // Tracker drops out; the very next frame reads the pointer
        scene.interaction.clear_hand();
        let without_hand = scene.advance(DT, &camera);
        assert!(without_hand.cursor_world.x < 0.0);
    }

    #[test]
    fn test_hand_loss_keeps_rotation_continuous() {
        let mut scene = scene();
        let camera = camera();

        // Drag with the hand, then lose tracking mid-drag
        scene.interaction.set_hand(0.0, 0.0, true, true);
        scene.advance(DT, &camera);
        scene.interaction.set_hand(0.1, 0.0, true, true);
        scene.advance(DT, &camera);

        scene.pointer.set(0.1, 0.0);
        scene.interaction.clear_hand();
        let before = scene.rotation();
        let after = scene.advance(DT, &camera).rotation;

        // Same coordinate from the fallback source: no jump beyond one
        // frame's drag delta
        let one_frame_delta = 0.1 * 5.0 * 1.5;
        assert!((after - before).abs() <= one_frame_delta + 0.0001);
    }

    #[test]
    fn test_cursor_attracts_dust_toward_plane_point() {
        let mut scene = scene();
        let camera = camera();
        scene.pointer.set(0.0, 0.0);
        let summary = scene.advance(DT, &camera);
        // Center cursor lands near the look-at point
        assert!(summary.cursor_world.x.abs() < 0.01);
        assert!((summary.cursor_world.y - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_clock_accumulates() {
        let mut scene = scene();
        let camera = camera();
        for _ in 0..60 {
            scene.advance(DT, &camera);
        }
        assert!((scene.time() - 1.0).abs() < 0.001);
    }
}
