//! 4x4 transformation matrices and rotation state
//!
//! Matrices use the row-vector convention: a point is transformed as
//! `v · M` (see [`crate::math::multiply_vec`]), translation lives in row 3, and
//! `multiply(a, b)` applies `a` before `b`. The coordinate system is
//! left-handed: +x right, +y up, +z into the screen.
use log::warn;

use crate::math::{cross, dot, multiply, normalize, Mat4, Vec4};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Matrix constructors. All of them are pure and return fresh matrices.
pub struct Transform;

impl Transform {
    pub fn identity() -> Mat4 {
        Mat4::identity()
    }

    pub fn rotation_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::zeros();
        m[(0, 0)] = 1.0;
        m[(1, 1)] = c;
        m[(1, 2)] = s;
        m[(2, 1)] = -s;
        m[(2, 2)] = c;
        m[(3, 3)] = 1.0;
        m
    }

    pub fn rotation_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::zeros();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(1, 1)] = 1.0;
        m[(2, 2)] = c;
        m[(3, 3)] = 1.0;
        m
    }

    pub fn rotation_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::zeros();
        m[(0, 0)] = c;
        m[(0, 1)] = s;
        m[(1, 0)] = -s;
        m[(1, 1)] = c;
        m[(2, 2)] = 1.0;
        m[(3, 3)] = 1.0;
        m
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation(rotation: &RotationState) -> Mat4 {
        let rz = Self::rotation_z(rotation.z);
        let ry = Self::rotation_y(rotation.y);
        let rx = Self::rotation_x(rotation.x);

        // Apply rotations in order: Z, Y, X
        multiply(&multiply(&rz, &ry), &rx)
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        let mut m = Mat4::identity();
        m[(3, 0)] = x;
        m[(3, 1)] = y;
        m[(3, 2)] = z;
        m
    }

    /// Perspective projection.
    ///
    /// `aspect` is height over width. The matrix copies view-space z into w,
    /// so dividing the result by its w performs the perspective divide and
    /// maps `near..far` onto `0..1`.
    pub fn projection(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let fov_rad = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
        let mut m = Mat4::zeros();
        m[(0, 0)] = aspect * fov_rad;
        m[(1, 1)] = fov_rad;
        m[(2, 2)] = far / (far - near);
        m[(3, 2)] = (-far * near) / (far - near);
        m[(2, 3)] = 1.0;
        m[(3, 3)] = 0.0;
        m
    }

    /// Camera basis placed at `pos` facing `target`.
    #[rustfmt::skip]
    pub fn point_at(pos: &Vec4, target: &Vec4, up: &Vec4) -> Mat4 {
        let forward = normalize(&(target - pos));
        let adjusted_up = normalize(&(up - forward * dot(up, &forward)));
        let right = cross(&adjusted_up, &forward);
        let new_up = cross(&forward, &right);

        Mat4::new(
            right.x, right.y, right.z, 0.0,
            new_up.x, new_up.y, new_up.z, 0.0,
            forward.x, forward.y, forward.z, 0.0,
            pos.x, pos.y, pos.z, 1.0,
        )
    }

    /// Inverse of a rotation + translation matrix.
    ///
    /// Only valid when the upper 3x3 block is orthonormal (no scale or
    /// shear); use [`Transform::inverse`] otherwise.
    pub fn quick_inverse(a: &Mat4) -> Mat4 {
        let mut m = Mat4::zeros();
        for row in 0..3 {
            for col in 0..3 {
                m[(row, col)] = a[(col, row)];
            }
        }
        for col in 0..3 {
            m[(3, col)] = -(a[(3, 0)] * m[(0, col)]
                + a[(3, 1)] * m[(1, col)]
                + a[(3, 2)] * m[(2, col)]);
        }
        m[(3, 3)] = 1.0;
        m
    }

    /// General inverse, `None` when the matrix is singular
    pub fn inverse(m: &Mat4) -> Option<Mat4> {
        m.try_inverse()
    }

    /// True when the upper 3x3 block is orthonormal and the last column is (0, 0, 0, 1)
    pub fn is_rigid(m: &Mat4) -> bool {
        const EPSILON: f32 = 1e-4;
        let basis = m.fixed_view::<3, 3>(0, 0);
        let gram = basis * basis.transpose();
        let orthonormal = (0..3).all(|i| {
            (0..3).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (gram[(i, j)] - expected).abs() < EPSILON
            })
        });
        let affine = m[(0, 3)].abs() < EPSILON
            && m[(1, 3)].abs() < EPSILON
            && m[(2, 3)].abs() < EPSILON
            && (m[(3, 3)] - 1.0).abs() < EPSILON;
        orthonormal && affine
    }

    /// View matrix from a camera matrix: fast inverse when the camera is
    /// rigid, general inverse when it carries scale.
    pub fn view_from_camera(camera: &Mat4) -> Mat4 {
        if Self::is_rigid(camera) {
            return Self::quick_inverse(camera);
        }
        warn!("Camera matrix is not rigid, using general inverse");
        Self::inverse(camera).unwrap_or_else(|| {
            warn!("Camera matrix is singular, falling back to identity view");
            Mat4::identity()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{divide, multiply_vec, vec3};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn sample_matrix() -> Mat4 {
        Mat4::from_fn(|r, c| (r * 4 + c) as f32 * 0.5 - 3.0)
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation(&rotation);
        assert!((matrix - Mat4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_identity_laws() {
        let m = sample_matrix();
        assert_eq!(multiply(&m, &Transform::identity()), m);
        let v = Vec4::new(1.5, -2.0, 3.25, 1.0);
        assert_eq!(multiply_vec(&Transform::identity(), &v), v);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let t = Transform::translation(1.0, 2.0, 3.0);
        assert_eq!(multiply_vec(&t, &vec3(1.0, 1.0, 1.0)), vec3(2.0, 3.0, 4.0));
        let d = Vec4::new(1.0, 1.0, 1.0, 0.0);
        assert_eq!(multiply_vec(&t, &d), d);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let v = multiply_vec(&Transform::rotation_y(FRAC_PI_2), &vec3(0.0, 0.0, 1.0));
        assert_relative_eq!(v, vec3(-1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_multiply_applies_left_first() {
        let rotate = Transform::rotation_z(FRAC_PI_2);
        let translate = Transform::translation(5.0, 0.0, 0.0);
        let world = multiply(&rotate, &translate);
        let v = multiply_vec(&world, &vec3(1.0, 0.0, 0.0));
        // (1,0,0) rotated about z lands on (0,1,0), then moves by +5 in x
        assert_relative_eq!(v, vec3(5.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_projection_depth_is_monotonic() {
        let near = 0.1;
        let far = 100.0;
        let proj = Transform::projection(90.0, 0.5, near, far);
        let mut last = -1.0;
        for d in [0.1, 0.5, 1.0, 10.0, 50.0, 100.0] {
            let clip = multiply_vec(&proj, &vec3(0.0, 0.0, d));
            assert_relative_eq!(clip.w, d);
            let ndc = divide(&clip, clip.w);
            assert!(ndc.z >= -1e-6 && ndc.z <= 1.0 + 1e-6, "z = {}", ndc.z);
            assert!(ndc.z > last);
            last = ndc.z;
        }
    }

    #[test]
    fn test_point_at_basis_is_rigid() {
        let pos = vec3(1.0, 2.0, -3.0);
        let target = vec3(4.0, 0.0, 2.0);
        let up = Vec4::new(0.0, 1.0, 0.0, 0.0);
        let camera = Transform::point_at(&pos, &target, &up);
        assert!(Transform::is_rigid(&camera));
    }

    #[test]
    fn test_quick_inverse_matches_general_inverse() {
        let pos = vec3(1.0, 2.0, -3.0);
        let target = vec3(0.0, 0.0, 0.0);
        let up = Vec4::new(0.0, 1.0, 0.0, 0.0);
        let camera = Transform::point_at(&pos, &target, &up);

        let quick = Transform::quick_inverse(&camera);
        let general = Transform::inverse(&camera).unwrap();
        assert_relative_eq!(quick, general, epsilon = 1e-5);

        // The camera position maps to the view-space origin
        let origin = multiply_vec(&quick, &pos);
        assert_relative_eq!(origin, vec3(0.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_view_from_scaled_camera_uses_general_inverse() {
        let mut camera = Transform::translation(1.0, 2.0, 3.0);
        camera[(0, 0)] = 2.0;
        assert!(!Transform::is_rigid(&camera));

        let view = Transform::view_from_camera(&camera);
        assert_relative_eq!(multiply(&camera, &view), Mat4::identity(), epsilon = 1e-5);
    }
}
