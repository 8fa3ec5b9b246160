pub mod primitives;

pub use primitives::{dodecahedron, octahedron, unit_box, uv_sphere, Mesh, Vertex};
