use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::camera::Camera;
use super::shaders::*;
use super::webgl::WebGLContext;
use crate::config::PostConfig;
use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use crate::particles::{FoliageField, FoliagePalette, FOLIAGE_STRIDE};

/// Scene lighting rig: one warm key, one green fill, green-tinted ambient
#[derive(Debug, Clone)]
pub struct Lighting {
    pub key_dir: Vec3,
    pub key_color: Vec3,
    pub fill_pos: Vec3,
    pub fill_color: Vec3,
    pub ambient_color: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            key_dir: Vec3::new(10.0, 20.0, 10.0).normalize(),
            key_color: Vec3::new(0.984, 0.749, 0.141),
            fill_pos: Vec3::new(-10.0, 5.0, -10.0),
            fill_color: Vec3::new(0.063, 0.725, 0.506),
            ambient_color: Vec3::new(0.024, 0.306, 0.231).scale(0.4),
        }
    }
}

/// How an instanced draw is shaded
#[derive(Debug, Clone, Copy)]
pub enum Shading {
    Lit,
    Emissive { intensity: f32 },
}

/// Handle to an instanced draw registered with the pipeline
#[derive(Debug, Clone, Copy)]
pub struct InstancedMeshId(usize);

struct InstancedDraw {
    vao: WebGlVertexArrayObject,
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    transform_buffer: WebGlBuffer,
    _color_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
    shading: Shading,
    /// Whether the shared group yaw applies (dust floats outside the group)
    follows_rotation: bool,
}

/// Cached uniform locations for the foliage point shader
struct FoliageUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    color_low: Option<WebGlUniformLocation>,
    color_high: Option<WebGlUniformLocation>,
    color_sparkle: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the lit instance shader
struct LitUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    key_dir: Option<WebGlUniformLocation>,
    key_color: Option<WebGlUniformLocation>,
    fill_pos: Option<WebGlUniformLocation>,
    fill_color: Option<WebGlUniformLocation>,
    ambient_color: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the emissive instance shader
struct EmissiveUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    intensity: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the post passes
struct PostUniforms {
    texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_strength: Option<WebGlUniformLocation>,
    exposure: Option<WebGlUniformLocation>,
}

/// Complete render pipeline: scene pass, bloom chain, composite
pub struct RenderPipeline {
    ctx: WebGLContext,

    foliage_program: WebGlProgram,
    lit_program: WebGlProgram,
    emissive_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    foliage_uniforms: FoliageUniforms,
    lit_uniforms: LitUniforms,
    emissive_uniforms: EmissiveUniforms,
    post_uniforms: PostUniforms,

    foliage_vao: Option<WebGlVertexArrayObject>,
    _foliage_buffer: Option<WebGlBuffer>,
    foliage_count: i32,
    foliage_palette: FoliagePalette,

    draws: Vec<InstancedDraw>,

    scene_texture: Option<WebGlTexture>,
    scene_fbo: Option<WebGlFramebuffer>,
    bloom_textures: [Option<WebGlTexture>; 2],
    bloom_fbos: [Option<WebGlFramebuffer>; 2],

    width: i32,
    height: i32,

    pub camera: Camera,
    pub lighting: Lighting,
    post: PostConfig,
}

impl RenderPipeline {
    pub fn new(
        gl: WebGl2RenderingContext,
        width: i32,
        height: i32,
        post: PostConfig,
    ) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, FOLIAGE_FRAGMENT_SHADER)?;
        let lit_program = ctx.create_program(INSTANCE_VERTEX_SHADER, LIT_FRAGMENT_SHADER)?;
        let emissive_program = ctx.create_program(INSTANCE_VERTEX_SHADER, EMISSIVE_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let foliage_uniforms = FoliageUniforms {
            model: ctx.get_uniform_location(&foliage_program, "u_model"),
            view: ctx.get_uniform_location(&foliage_program, "u_view"),
            projection: ctx.get_uniform_location(&foliage_program, "u_projection"),
            time: ctx.get_uniform_location(&foliage_program, "u_time"),
            progress: ctx.get_uniform_location(&foliage_program, "u_progress"),
            color_low: ctx.get_uniform_location(&foliage_program, "u_color_low"),
            color_high: ctx.get_uniform_location(&foliage_program, "u_color_high"),
            color_sparkle: ctx.get_uniform_location(&foliage_program, "u_color_sparkle"),
        };

        let lit_uniforms = LitUniforms {
            model: ctx.get_uniform_location(&lit_program, "u_model"),
            view: ctx.get_uniform_location(&lit_program, "u_view"),
            projection: ctx.get_uniform_location(&lit_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&lit_program, "u_camera_pos"),
            key_dir: ctx.get_uniform_location(&lit_program, "u_key_dir"),
            key_color: ctx.get_uniform_location(&lit_program, "u_key_color"),
            fill_pos: ctx.get_uniform_location(&lit_program, "u_fill_pos"),
            fill_color: ctx.get_uniform_location(&lit_program, "u_fill_color"),
            ambient_color: ctx.get_uniform_location(&lit_program, "u_ambient_color"),
        };

        let emissive_uniforms = EmissiveUniforms {
            model: ctx.get_uniform_location(&emissive_program, "u_model"),
            view: ctx.get_uniform_location(&emissive_program, "u_view"),
            projection: ctx.get_uniform_location(&emissive_program, "u_projection"),
            intensity: ctx.get_uniform_location(&emissive_program, "u_intensity"),
        };

        let post_uniforms = PostUniforms {
            texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_strength: ctx.get_uniform_location(&composite_program, "u_vignette_strength"),
            exposure: ctx.get_uniform_location(&composite_program, "u_exposure"),
        };

        let mut pipeline = Self {
            ctx,
            foliage_program,
            lit_program,
            emissive_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            foliage_uniforms,
            lit_uniforms,
            emissive_uniforms,
            post_uniforms,
            foliage_vao: None,
            _foliage_buffer: None,
            foliage_count: 0,
            foliage_palette: FoliagePalette {
                low: Vec3::ZERO,
                high: Vec3::ZERO,
                sparkle: Vec3::ZERO,
            },
            draws: Vec::new(),
            scene_texture: None,
            scene_fbo: None,
            bloom_textures: [None, None],
            bloom_fbos: [None, None],
            width,
            height,
            camera: Camera::framed(width, height),
            lighting: Lighting::default(),
            post,
        };

        pipeline.create_framebuffers()?;

        Ok(pipeline)
    }

    fn create_framebuffers(&mut self) -> Result<(), String> {
        let scene_tex = self.ctx.create_texture(self.width, self.height)?;
        let scene_fbo = self.ctx.create_framebuffer(&scene_tex)?;
        self.scene_texture = Some(scene_tex);
        self.scene_fbo = Some(scene_fbo);

        // Bloom runs at half resolution
        let bloom_width = (self.width / 2).max(1);
        let bloom_height = (self.height / 2).max(1);

        for i in 0..2 {
            let tex = self.ctx.create_texture(bloom_width, bloom_height)?;
            let fbo = self.ctx.create_framebuffer(&tex)?;
            self.bloom_textures[i] = Some(tex);
            self.bloom_fbos[i] = Some(fbo);
        }

        Ok(())
    }

    /// One-time upload of the foliage attribute buffer
    pub fn upload_foliage(&mut self, field: &FoliageField) -> Result<(), String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = self
            .ctx
            .create_buffer_f32(field.attribute_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));

        let stride = FOLIAGE_STRIDE as i32;
        self.ctx.attrib_f32(0, 3, stride, 0); // chaos
        self.ctx.attrib_f32(1, 3, stride, 3); // target
        self.ctx.attrib_f32(2, 1, stride, 6); // random

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        self.foliage_vao = Some(vao);
        self._foliage_buffer = Some(buffer);
        self.foliage_count = field.count() as i32;
        self.foliage_palette = *field.palette();

        Ok(())
    }

    /// Register an instanced mesh with initial transforms and fixed colors
    pub fn add_instanced(
        &mut self,
        mesh: &Mesh,
        transforms: &[f32],
        colors: &[f32],
        shading: Shading,
        follows_rotation: bool,
    ) -> Result<InstancedMeshId, String> {
        let instance_count = (transforms.len() / 16) as i32;
        debug_assert_eq!(colors.len() as i32, instance_count * 3);

        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = self
            .ctx
            .create_buffer_f32(&mesh.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        self.ctx.attrib_f32(0, 3, 6, 0); // position
        self.ctx.attrib_f32(1, 3, 6, 3); // normal

        let color_buffer = self
            .ctx
            .create_buffer_f32(colors, WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&color_buffer));
        self.ctx.attrib_f32_per_instance(2, 3, 3, 0);

        let transform_buffer = self
            .ctx
            .create_buffer_f32(transforms, WebGl2RenderingContext::DYNAMIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&transform_buffer));
        self.ctx.attrib_mat4_per_instance(3);

        let index_buffer = self
            .ctx
            .create_index_buffer(mesh.index_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        gl.bind_buffer(
            WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
            Some(&index_buffer),
        );

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, None);

        self.draws.push(InstancedDraw {
            vao,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            transform_buffer,
            _color_buffer: color_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count,
            shading,
            follows_rotation,
        });

        Ok(InstancedMeshId(self.draws.len() - 1))
    }

    /// Re-upload one group's transform buffer; called once per dirty group
    /// per frame
    pub fn update_instances(&self, id: InstancedMeshId, transforms: &[f32]) {
        let draw = &self.draws[id.0];
        self.ctx
            .update_buffer_f32(&draw.transform_buffer, transforms);
    }

    /// Render a frame: scene pass, bloom extract/blur, composite
    pub fn render(&self, time: f32, foliage_progress: f32, group_rotation: f32) {
        let gl = &self.ctx.gl;

        let view = self.camera.view();
        let projection = self.camera.projection();
        let rotation_model = Mat4::rotation_y(group_rotation);
        let identity = Mat4::identity();

        // === Pass 1: scene into offscreen framebuffer ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.scene_fbo.as_ref());
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.016, 0.027, 0.055, 1.0);
        self.ctx.enable_depth_test();
        self.ctx.set_depth_write(true);
        self.ctx.disable_blending();

        // Lit instanced groups
        gl.use_program(Some(&self.lit_program));
        self.ctx
            .uniform_matrix4fv(self.lit_uniforms.view.as_ref(), view.as_slice());
        self.ctx
            .uniform_matrix4fv(self.lit_uniforms.projection.as_ref(), projection.as_slice());
        let cam = self.camera.position;
        self.ctx
            .uniform_3f(self.lit_uniforms.camera_pos.as_ref(), cam.x, cam.y, cam.z);
        let l = &self.lighting;
        self.ctx.uniform_3f(
            self.lit_uniforms.key_dir.as_ref(),
            l.key_dir.x,
            l.key_dir.y,
            l.key_dir.z,
        );
        self.ctx.uniform_3f(
            self.lit_uniforms.key_color.as_ref(),
            l.key_color.x,
            l.key_color.y,
            l.key_color.z,
        );
        self.ctx.uniform_3f(
            self.lit_uniforms.fill_pos.as_ref(),
            l.fill_pos.x,
            l.fill_pos.y,
            l.fill_pos.z,
        );
        self.ctx.uniform_3f(
            self.lit_uniforms.fill_color.as_ref(),
            l.fill_color.x,
            l.fill_color.y,
            l.fill_color.z,
        );
        self.ctx.uniform_3f(
            self.lit_uniforms.ambient_color.as_ref(),
            l.ambient_color.x,
            l.ambient_color.y,
            l.ambient_color.z,
        );

        for draw in self.draws.iter().filter(|d| matches!(d.shading, Shading::Lit)) {
            let model = if draw.follows_rotation { &rotation_model } else { &identity };
            self.ctx
                .uniform_matrix4fv(self.lit_uniforms.model.as_ref(), model.as_slice());
            gl.bind_vertex_array(Some(&draw.vao));
            self.ctx
                .draw_elements_instanced(draw.index_count, draw.instance_count);
        }

        // Emissive instanced groups
        gl.use_program(Some(&self.emissive_program));
        self.ctx
            .uniform_matrix4fv(self.emissive_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(
            self.emissive_uniforms.projection.as_ref(),
            projection.as_slice(),
        );

        for draw in &self.draws {
            let intensity = match draw.shading {
                Shading::Emissive { intensity } => intensity,
                Shading::Lit => continue,
            };
            let model = if draw.follows_rotation { &rotation_model } else { &identity };
            self.ctx
                .uniform_matrix4fv(self.emissive_uniforms.model.as_ref(), model.as_slice());
            self.ctx
                .uniform_1f(self.emissive_uniforms.intensity.as_ref(), intensity);
            gl.bind_vertex_array(Some(&draw.vao));
            self.ctx
                .draw_elements_instanced(draw.index_count, draw.instance_count);
        }

        // Foliage points last: depth-tested but not depth-written
        if self.foliage_vao.is_some() && self.foliage_count > 0 {
            gl.use_program(Some(&self.foliage_program));
            self.ctx.set_depth_write(false);
            self.ctx.enable_blending();

            self.ctx.uniform_matrix4fv(
                self.foliage_uniforms.model.as_ref(),
                rotation_model.as_slice(),
            );
            self.ctx
                .uniform_matrix4fv(self.foliage_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(
                self.foliage_uniforms.projection.as_ref(),
                projection.as_slice(),
            );
            self.ctx
                .uniform_1f(self.foliage_uniforms.time.as_ref(), time);
            self.ctx
                .uniform_1f(self.foliage_uniforms.progress.as_ref(), foliage_progress);
            let p = &self.foliage_palette;
            self.ctx.uniform_3f(
                self.foliage_uniforms.color_low.as_ref(),
                p.low.x,
                p.low.y,
                p.low.z,
            );
            self.ctx.uniform_3f(
                self.foliage_uniforms.color_high.as_ref(),
                p.high.x,
                p.high.y,
                p.high.z,
            );
            self.ctx.uniform_3f(
                self.foliage_uniforms.color_sparkle.as_ref(),
                p.sparkle.x,
                p.sparkle.y,
                p.sparkle.z,
            );

            gl.bind_vertex_array(self.foliage_vao.as_ref());
            gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, self.foliage_count);
            self.ctx.set_depth_write(true);
        }

        gl.bind_vertex_array(None);

        // === Pass 2: bloom extract at half resolution ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[0].as_ref());
        self.ctx
            .viewport(0, 0, (self.width / 2).max(1), (self.height / 2).max(1));
        self.ctx.disable_depth_test();
        self.ctx.disable_blending();

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.texture.as_ref(), 0);
        self.ctx
            .uniform_1f(self.post_uniforms.threshold.as_ref(), self.post.bloom_threshold);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 3 + 4: separable blur ping-pong ===
        gl.use_program(Some(&self.blur_program));

        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[1].as_ref());
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[0].as_ref());
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 1.0, 0.0);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[0].as_ref());
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[1].as_ref());
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 0.0, 1.0);
        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 5: composite to the default framebuffer ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);

        gl.use_program(Some(&self.composite_program));

        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(WebGl2RenderingContext::TEXTURE1);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[0].as_ref());
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx
            .uniform_1f(self.post_uniforms.bloom_strength.as_ref(), self.post.bloom_strength);
        self.ctx.uniform_1f(
            self.post_uniforms.vignette_strength.as_ref(),
            self.post.vignette_strength,
        );
        self.ctx
            .uniform_1f(self.post_uniforms.exposure.as_ref(), self.post.exposure);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);
    }

    /// Resize render targets and reframe the camera
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        self.camera.reframe(width, height);
        self.create_framebuffers()
    }
}
