//! Primitive geometries for the instanced ornament groups
//!
//! Flat-shaded unit solids: gift boxes, ball baubles, light bulbs, emerald
//! octahedra, and the dodecahedral dust motes. Each instance scales these in
//! its transform, so every generator emits a unit-sized solid.

use crate::math::Vec3;

/// A vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Layout: position(3) + normal(3) = 6 floats
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// A mesh composed of vertices and triangle indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Flatten to interleaved floats for WebGL upload
    pub fn vertex_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertices.len() * 6);
        for v in &self.vertices {
            data.extend_from_slice(&v.to_array());
        }
        data
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }
}

/// Axis-aligned cube with side 1, flat face normals
pub fn unit_box() -> Mesh {
    let mut mesh = Mesh::new();
    let h = 0.5;

    let faces: [(Vec3, Vec3, Vec3); 6] = [
        // (normal, tangent u, tangent v)
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    ];

    for (normal, u, v) in faces {
        let center = normal.scale(h);
        let base = mesh.add_vertices([
            Vertex::new(center - u.scale(h) - v.scale(h), normal),
            Vertex::new(center + u.scale(h) - v.scale(h), normal),
            Vertex::new(center + u.scale(h) + v.scale(h), normal),
            Vertex::new(center - u.scale(h) + v.scale(h), normal),
        ]);
        mesh.add_quad(base, base + 1, base + 2, base + 3);
    }

    mesh
}

/// Latitude/longitude sphere; normals point radially
pub fn uv_sphere(radius: f32, segments: usize, rings: usize) -> Mesh {
    debug_assert!(segments >= 3 && rings >= 2);
    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            mesh.add_vertices([Vertex::new(normal.scale(radius), normal)]);
        }
    }

    let stride = (segments + 1) as u32;
    for ring in 0..rings as u32 {
        for seg in 0..segments as u32 {
            let a = ring * stride + seg;
            let b = a + stride;
            mesh.add_quad(a, a + 1, b + 1, b);
        }
    }

    mesh
}

/// Octahedron with unit circumradius, flat face normals
pub fn octahedron() -> Mesh {
    let mut mesh = Mesh::new();

    let tips = [Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0)];
    let equator = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
    ];

    for (tip_idx, tip) in tips.iter().enumerate() {
        for i in 0..4 {
            let a = equator[i];
            let b = equator[(i + 1) % 4];
            // Counter-clockwise from outside; mirrored on the lower half
            let (v0, v1, v2) = if tip_idx == 0 { (a, *tip, b) } else { (b, *tip, a) };
            let normal = (v1 - v0).cross(&(v2 - v0)).normalize();
            let base = mesh.add_vertices([
                Vertex::new(v0, normal),
                Vertex::new(v1, normal),
                Vertex::new(v2, normal),
            ]);
            mesh.add_triangle(base, base + 1, base + 2);
        }
    }

    mesh
}

/// Regular dodecahedron with unit-ish circumradius, flat pentagonal faces
pub fn dodecahedron() -> Mesh {
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;

    let mut corners = Vec::with_capacity(20);
    for x in [-1.0f32, 1.0] {
        for y in [-1.0f32, 1.0] {
            for z in [-1.0f32, 1.0] {
                corners.push(Vec3::new(x, y, z));
            }
        }
    }
    for a in [-inv, inv] {
        for b in [-phi, phi] {
            corners.push(Vec3::new(0.0, a, b));
            corners.push(Vec3::new(a, b, 0.0));
            corners.push(Vec3::new(b, 0.0, a));
        }
    }

    // Face centers point along the icosahedron vertex directions; each face
    // is the five corners closest to its center, fanned in angular order
    let mut face_dirs = Vec::with_capacity(12);
    for a in [-1.0f32, 1.0] {
        for b in [-phi, phi] {
            face_dirs.push(Vec3::new(0.0, a, b).normalize());
            face_dirs.push(Vec3::new(a, b, 0.0).normalize());
            face_dirs.push(Vec3::new(b, 0.0, a).normalize());
        }
    }

    let scale = 1.0 / 3.0f32.sqrt();
    let mut mesh = Mesh::new();

    for dir in face_dirs {
        let mut face: Vec<Vec3> = corners.clone();
        face.sort_by(|p, q| dir.dot(q).partial_cmp(&dir.dot(p)).unwrap_or(std::cmp::Ordering::Equal));
        face.truncate(5);

        // Order the pentagon around the face normal
        let center = face
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + *p)
            .scale(1.0 / 5.0);
        let u = (face[0] - center).normalize();
        let v = dir.cross(&u);
        face.sort_by(|p, q| {
            let pa = (*p - center).dot(&v).atan2((*p - center).dot(&u));
            let qa = (*q - center).dot(&v).atan2((*q - center).dot(&u));
            pa.partial_cmp(&qa).unwrap_or(std::cmp::Ordering::Equal)
        });

        let base = mesh.add_vertices(
            face.iter()
                .map(|p| Vertex::new(p.scale(scale), dir)),
        );
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
        mesh.add_triangle(base, base + 3, base + 4);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mesh_integrity(mesh: &Mesh) {
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        for &idx in &mesh.indices {
            assert!((idx as usize) < mesh.vertices.len());
        }
        for v in &mesh.vertices {
            assert!(v.position.is_finite());
            assert!((v.normal.length() - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_unit_box() {
        let mesh = unit_box();
        assert_mesh_integrity(&mesh);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            assert!(v.position.x.abs() <= 0.5001);
            assert!(v.position.y.abs() <= 0.5001);
            assert!(v.position.z.abs() <= 0.5001);
        }
    }

    #[test]
    fn test_uv_sphere() {
        let mesh = uv_sphere(1.0, 16, 16);
        assert_mesh_integrity(&mesh);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 0.001);
        }
        assert_eq!(mesh.indices.len(), 16 * 16 * 6);
    }

    #[test]
    fn test_octahedron() {
        let mesh = octahedron();
        assert_mesh_integrity(&mesh);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 24);
        // Face normals point away from the origin
        for chunk in mesh.indices.chunks(3) {
            let centroid = (mesh.vertices[chunk[0] as usize].position
                + mesh.vertices[chunk[1] as usize].position
                + mesh.vertices[chunk[2] as usize].position)
                .scale(1.0 / 3.0);
            assert!(mesh.vertices[chunk[0] as usize].normal.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_dodecahedron() {
        let mesh = dodecahedron();
        assert_mesh_integrity(&mesh);
        assert_eq!(mesh.vertices.len(), 60);
        assert_eq!(mesh.indices.len(), 108);
        // All corners share the circumradius
        let r = mesh.vertices[0].position.length();
        for v in &mesh.vertices {
            assert!((v.position.length() - r).abs() < 0.001);
        }
        // Every face's five corners lie in its plane
        for face in mesh.vertices.chunks(5) {
            let d0 = face[0].normal.dot(&face[0].position);
            for v in face {
                assert!((v.normal.dot(&v.position) - d0).abs() < 0.001);
            }
        }
    }
}
