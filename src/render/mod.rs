pub mod camera;
pub mod pipeline;
pub mod shaders;
pub mod webgl;

pub use camera::Camera;
pub use pipeline::{InstancedMeshId, Lighting, RenderPipeline, Shading};
pub use webgl::WebGLContext;
