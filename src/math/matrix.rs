use super::Vec3;

/// 4x4 matrix for transformations (column-major for WebGL)
#[derive(Debug, Clone, Copy)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[12] = x;
        m.data[13] = y;
        m.data[14] = z;
        m
    }

    pub fn scale_uniform(s: f32) -> Self {
        let mut m = Self::identity();
        m.data[0] = s;
        m.data[5] = s;
        m.data[10] = s;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, c, s, 0.0,
                0.0, -s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                c, 0.0, -s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                c, s, 0.0, 0.0,
                -s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Compose translation, yaw/pitch/roll (applied y, then x, then z), and
    /// uniform scale into one instance transform
    pub fn trs(position: Vec3, yaw: f32, pitch: f32, roll: f32, scale: f32) -> Self {
        Mat4::translation(position.x, position.y, position.z)
            .mul(&Mat4::rotation_y(yaw))
            .mul(&Mat4::rotation_x(pitch))
            .mul(&Mat4::rotation_z(roll))
            .mul(&Mat4::scale_uniform(scale))
    }

    /// Perspective projection matrix
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = 1.0 / (near - far);

        Self {
            data: [
                f / aspect, 0.0, 0.0, 0.0,
                0.0, f, 0.0, 0.0,
                0.0, 0.0, (far + near) * nf, -1.0,
                0.0, 0.0, 2.0 * far * near * nf, 0.0,
            ],
        }
    }

    /// Look-at view matrix
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let r = f.cross(&up).normalize();
        let u = r.cross(&f);

        Self {
            data: [
                r.x, u.x, -f.x, 0.0,
                r.y, u.y, -f.y, 0.0,
                r.z, u.z, -f.z, 0.0,
                -r.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0,
            ],
        }
    }

    /// Matrix multiplication
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.data[row + k * 4] * other.data[k + col * 4];
                }
                result[row + col * 4] = sum;
            }
        }

        Self { data: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * p.x + self.data[4] * p.y + self.data[8] * p.z + self.data[12],
            self.data[1] * p.x + self.data[5] * p.y + self.data[9] * p.z + self.data[13],
            self.data[2] * p.x + self.data[6] * p.y + self.data[10] * p.z + self.data[14],
        )
    }

    /// Transform a direction (ignores translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * d.x + self.data[4] * d.y + self.data[8] * d.z,
            self.data[1] * d.x + self.data[5] * d.y + self.data[9] * d.z,
            self.data[2] * d.x + self.data[6] * d.y + self.data[10] * d.z,
        )
    }

    /// Copy the 16 floats into an instance attribute buffer slice
    pub fn write_to(&self, out: &mut [f32]) {
        out[..16].copy_from_slice(&self.data);
    }

    /// Get as slice for WebGL
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = Mat4::identity();
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(m.transform_point(p), p);
    }

    #[test]
    fn test_translation() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        let result = m.transform_point(Vec3::ZERO);
        assert!((result.x - 1.0).abs() < 0.0001);
        assert!((result.y - 2.0).abs() < 0.0001);
        assert!((result.z - 3.0).abs() < 0.0001);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        let result = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(result.x.abs() < 0.0001);
        assert!((result.z + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_trs_translates_scaled_point() {
        // No rotation: just scale then translate
        let m = Mat4::trs(Vec3::new(5.0, 0.0, 0.0), 0.0, 0.0, 0.0, 2.0);
        let result = m.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert!((result.x - 7.0).abs() < 0.0001);
        assert!((result.y - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_trs_yaw_spins_about_vertical() {
        let m = Mat4::trs(Vec3::ZERO, std::f32::consts::PI, 0.0, 0.0, 1.0);
        let result = m.transform_point(Vec3::new(1.0, 0.5, 0.0));
        assert!((result.x + 1.0).abs() < 0.0001);
        // Vertical component untouched by yaw
        assert!((result.y - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_write_to_layout() {
        let m = Mat4::translation(7.0, 8.0, 9.0);
        let mut buf = [0.0f32; 32];
        m.write_to(&mut buf[16..]);
        // Column-major: translation lands in floats 12..15 of the block
        assert_eq!(buf[16 + 12], 7.0);
        assert_eq!(buf[16 + 13], 8.0);
        assert_eq!(buf[16 + 14], 9.0);
        assert_eq!(buf[16 + 15], 1.0);
        assert_eq!(buf[0], 0.0);
    }

    #[test]
    fn test_matrix_mul_order() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let s = Mat4::scale_uniform(2.0);
        let combined = t.mul(&s);
        let result = combined.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((result.x - 3.0).abs() < 0.0001);
    }
}
