use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod math;
pub mod mesh;
pub mod particles;
pub mod render;
pub mod scene;
pub mod visual;

// Re-export the frame analyzer for JavaScript test harnesses
pub use visual::metrics::FrameAnalyzer;

use config::SceneConfig;
use mesh::{dodecahedron, octahedron, unit_box, uv_sphere, Mesh};
use particles::OrnamentKind;
use render::{InstancedMeshId, RenderPipeline, Shading};
use scene::SceneState;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main scene handle exposed to JavaScript
#[wasm_bindgen]
pub struct GrandTreeScene {
    pipeline: RenderPipeline,
    state: SceneState,
    ornament_ids: Vec<InstancedMeshId>,
    dust_id: InstancedMeshId,
    star_id: InstancedMeshId,
}

#[wasm_bindgen]
impl GrandTreeScene {
    /// Create a scene with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<GrandTreeScene, JsValue> {
        Self::build(canvas, SceneConfig::default())
    }

    /// Create a scene with YAML overrides for counts, palette, damping
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<GrandTreeScene, JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| JsValue::from_str(&e))?;
        Self::build(canvas, config)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<GrandTreeScene, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let mut pipeline = RenderPipeline::new(gl, width, height, config.post.clone())
            .map_err(|e| JsValue::from_str(&e))?;

        let mut state = SceneState::new(&config).map_err(|e| JsValue::from_str(&e))?;

        // Settle every group into its chaos pose before the first upload
        let formed = state.is_formed();
        state.ornaments.update(formed, 0.0);
        state.star.update(formed, 0.0, 0.0);

        pipeline
            .upload_foliage(&state.foliage)
            .map_err(|e| JsValue::from_str(&e))?;

        let mut ornament_ids = Vec::with_capacity(4);
        for group in state.ornaments.groups() {
            let (mesh, shading) = ornament_appearance(group.kind());
            let id = pipeline
                .add_instanced(&mesh, group.transform_data(), group.color_data(), shading, true)
                .map_err(|e| JsValue::from_str(&e))?;
            ornament_ids.push(id);
        }

        let dust_colors: Vec<f32> = (0..state.dust.len())
            .flat_map(|_| state.dust.emissive().to_array())
            .collect();
        let dust_id = pipeline
            .add_instanced(
                &dodecahedron(),
                state.dust.transform_data(),
                &dust_colors,
                Shading::Emissive { intensity: 2.0 },
                false,
            )
            .map_err(|e| JsValue::from_str(&e))?;

        let star_id = pipeline
            .add_instanced(
                &octahedron(),
                state.star.matrix().as_slice(),
                &state.star.color().to_array(),
                Shading::Emissive { intensity: 3.0 },
                true,
            )
            .map_err(|e| JsValue::from_str(&e))?;

        web_sys::console::log_1(
            &format!(
                "grand-tree ready: {} needles, {} ornaments, {} dust motes",
                state.foliage.count(),
                state.ornaments.groups().iter().map(|g| g.len()).sum::<usize>(),
                state.dust.len(),
            )
            .into(),
        );

        Ok(Self {
            pipeline,
            state,
            ornament_ids,
            dust_id,
            star_id,
        })
    }

    /// Advance and render one frame; `dt` is the frame delta in seconds
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        let summary = self.state.advance(dt, &self.pipeline.camera);

        // One upload per dirty group per frame
        for (group, id) in self.state.ornaments.groups_mut().iter_mut().zip(&self.ornament_ids) {
            if group.is_dirty() {
                self.pipeline.update_instances(*id, group.transform_data());
                group.mark_uploaded();
            }
        }
        if self.state.dust.is_dirty() {
            self.pipeline
                .update_instances(self.dust_id, self.state.dust.transform_data());
            self.state.dust.mark_uploaded();
        }
        self.pipeline
            .update_instances(self.star_id, self.state.star.matrix().as_slice());

        self.pipeline
            .render(self.state.time(), summary.foliage_progress, summary.rotation);
    }

    /// Resize the viewport; reframes the camera and render targets
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        self.pipeline
            .resize(width, height)
            .map_err(|e| JsValue::from_str(&e))
    }

    // === Mode toggle ===

    #[wasm_bindgen]
    pub fn set_formed(&mut self, formed: bool) {
        self.state.set_formed(formed);
    }

    /// Flip between FORMED and CHAOS; returns the new mode
    #[wasm_bindgen]
    pub fn toggle_formed(&mut self) -> bool {
        self.state.toggle_formed()
    }

    #[wasm_bindgen]
    pub fn is_formed(&self) -> bool {
        self.state.is_formed()
    }

    // === Pointer input ===

    #[wasm_bindgen]
    pub fn pointer_down(&mut self) {
        self.state.interaction.set_down(true);
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self) {
        self.state.interaction.set_down(false);
    }

    /// Ambient pointer coordinates, normalized [-1, 1]
    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.state.pointer.set(x, y);
    }

    // === Read-back for UI and tests ===

    #[wasm_bindgen]
    pub fn foliage_progress(&self) -> f32 {
        self.state.foliage.progress()
    }

    #[wasm_bindgen]
    pub fn group_rotation(&self) -> f32 {
        self.state.rotation()
    }
}

/// Hand-tracking input path (off by default; see the `hand-tracking` feature)
#[cfg(feature = "hand-tracking")]
#[wasm_bindgen]
impl GrandTreeScene {
    /// Feed one frame of hand-tracker output
    pub fn set_hand_state(&mut self, x: f32, y: f32, pinch: bool, detected: bool) {
        self.state.interaction.set_hand(x, y, pinch, detected);
    }

    /// Tear down the hand input path; pointer input resumes next frame
    pub fn disable_hand_tracking(&mut self) {
        self.state.interaction.clear_hand();
    }
}

/// Geometry and shading for each ornament category
fn ornament_appearance(kind: OrnamentKind) -> (Mesh, Shading) {
    match kind {
        OrnamentKind::Box => (unit_box(), Shading::Lit),
        OrnamentKind::Ball => (uv_sphere(1.0, 16, 16), Shading::Lit),
        OrnamentKind::Light => (uv_sphere(0.5, 8, 8), Shading::Emissive { intensity: 1.0 }),
        OrnamentKind::Emerald => (octahedron(), Shading::Lit),
    }
}
