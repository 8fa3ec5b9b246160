//! Scene camera
//!
//! Fixed-target framing: the camera sits on the +z axis at whatever distance
//! keeps the full tree (20 units tall, 16 wide) in view for the current
//! aspect ratio. Also hosts the inverse-projection ray math the dust field
//! uses to place the cursor in world space.

use crate::math::{Mat4, Vec3};

/// Vertical field of view, radians (35 degrees)
const FOV_Y: f32 = 35.0 * std::f32::consts::PI / 180.0;
/// World extents that must stay visible
const REQUIRED_HEIGHT: f32 = 20.0;
const REQUIRED_WIDTH: f32 = 16.0;
/// Eye and look-at height
const EYE_HEIGHT: f32 = 1.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    aspect: f32,
}

impl Camera {
    /// Frame the scene for a viewport of the given pixel size
    pub fn framed(width: i32, height: i32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, EYE_HEIGHT, 30.0),
            target: Vec3::new(0.0, EYE_HEIGHT, 0.0),
            aspect: 1.0,
        };
        camera.reframe(width, height);
        camera
    }

    /// Recompute distance after a viewport change
    pub fn reframe(&mut self, width: i32, height: i32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;

        let visible_height_at_unit = 2.0 * (FOV_Y / 2.0).tan();
        let dist_for_height = REQUIRED_HEIGHT / visible_height_at_unit;
        let visible_width_at_unit = visible_height_at_unit * self.aspect;
        let dist_for_width = REQUIRED_WIDTH / visible_width_at_unit;

        self.position = Vec3::new(0.0, EYE_HEIGHT, dist_for_height.max(dist_for_width));
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, Vec3::UP)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(FOV_Y, self.aspect, NEAR, FAR)
    }

    /// Cast a ray through normalized device coordinates and intersect the
    /// vertical plane z = `plane_z`
    pub fn unproject_to_plane(&self, ndc_x: f32, ndc_y: f32, plane_z: f32) -> Vec3 {
        let dir = self.ray_direction(ndc_x, ndc_y);
        if dir.z.abs() < 1e-6 {
            return self.target;
        }
        let t = (plane_z - self.position.z) / dir.z;
        self.position + dir.scale(t)
    }

    fn ray_direction(&self, ndc_x: f32, ndc_y: f32) -> Vec3 {
        let inv_proj = invert_perspective(&self.projection());
        let inv_view = invert_view(&self.view());

        let ray_clip = Vec3::new(ndc_x, ndc_y, -1.0);
        let ray_view = inv_proj.transform_point(ray_clip);
        let ray_view = Vec3::new(ray_view.x, ray_view.y, -1.0);

        inv_view.transform_direction(ray_view).normalize()
    }
}

/// Direct inverse of a standard perspective matrix
fn invert_perspective(m: &Mat4) -> Mat4 {
    let a = m.data[0];
    let b = m.data[5];
    let c = m.data[10];
    let d = m.data[14];
    let e = m.data[11];

    let mut inv = Mat4::identity();
    inv.data[0] = 1.0 / a;
    inv.data[5] = 1.0 / b;
    inv.data[10] = 0.0;
    inv.data[11] = 1.0 / d;
    inv.data[14] = 1.0 / e;
    inv.data[15] = -c / (d * e);
    inv
}

/// Inverse of an orthonormal view matrix: transposed rotation, re-derived
/// translation
fn invert_view(m: &Mat4) -> Mat4 {
    let mut inv = Mat4::identity();

    inv.data[0] = m.data[0];
    inv.data[1] = m.data[4];
    inv.data[2] = m.data[8];

    inv.data[4] = m.data[1];
    inv.data[5] = m.data[5];
    inv.data[6] = m.data[9];

    inv.data[8] = m.data[2];
    inv.data[9] = m.data[6];
    inv.data[10] = m.data[10];

    let tx = m.data[12];
    let ty = m.data[13];
    let tz = m.data[14];

    inv.data[12] = -(inv.data[0] * tx + inv.data[4] * ty + inv.data[8] * tz);
    inv.data[13] = -(inv.data[1] * tx + inv.data[5] * ty + inv.data[9] * tz);
    inv.data[14] = -(inv.data[2] * tx + inv.data[6] * ty + inv.data[10] * tz);

    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_viewport_is_height_bound() {
        // Once the aspect clears 16/20, height decides the distance
        let wide = Camera::framed(1600, 800);
        let square = Camera::framed(800, 800);
        assert!((wide.position.z - square.position.z).abs() < 0.001);
        assert!(square.position.z > 20.0);
    }

    #[test]
    fn test_narrow_viewport_backs_off_for_width() {
        let sliver = Camera::framed(400, 800);
        let square = Camera::framed(800, 800);
        assert!(sliver.position.z > square.position.z);
    }

    #[test]
    fn test_center_ray_hits_target_plane() {
        let camera = Camera::framed(800, 600);
        let hit = camera.unproject_to_plane(0.0, 0.0, 0.0);
        assert!(hit.x.abs() < 0.001);
        assert!((hit.y - 1.0).abs() < 0.001);
        assert!(hit.z.abs() < 0.001);
    }

    #[test]
    fn test_unproject_follows_screen_direction() {
        let camera = Camera::framed(800, 600);
        let right = camera.unproject_to_plane(0.5, 0.0, 0.0);
        let left = camera.unproject_to_plane(-0.5, 0.0, 0.0);
        let up = camera.unproject_to_plane(0.0, 0.5, 0.0);
        assert!(right.x > 0.0);
        assert!(left.x < 0.0);
        assert!((right.x + left.x).abs() < 0.001);
        assert!(up.y > 1.0);
    }

    #[test]
    fn test_unprojected_point_is_on_plane() {
        let camera = Camera::framed(1024, 768);
        for (x, y) in [(0.3, -0.7), (-1.0, 1.0), (0.9, 0.1)] {
            let hit = camera.unproject_to_plane(x, y, 0.0);
            assert!(hit.z.abs() < 0.001);
            assert!(hit.is_finite());
        }
    }
}
