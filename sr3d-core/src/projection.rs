//! Camera and projection utilities
use crate::math::{direction, multiply_vec, vec3, Mat4, Vec4};
use crate::transform::Transform;

/// First-person camera: a position and a yaw around the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec4,
    /// Radians, positive turns left
    pub yaw: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec4) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Unit direction the camera faces
    pub fn look_direction(&self) -> Vec4 {
        multiply_vec(&Transform::rotation_y(self.yaw), &direction(0.0, 0.0, 1.0))
    }

    /// Camera placement matrix (camera space to world space)
    pub fn camera_matrix(&self) -> Mat4 {
        let target = self.position + self.look_direction();
        let up = direction(0.0, 1.0, 0.0);
        Transform::point_at(&self.position, &target, &up)
    }

    /// Create the view matrix (world space to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Transform::view_from_camera(&self.camera_matrix())
    }

    /// Create the projection matrix for a viewport
    pub fn projection_matrix(&self, width: usize, height: usize) -> Mat4 {
        let aspect = height as f32 / width.max(1) as f32;
        Transform::projection(self.fov_degrees, aspect, self.near, self.far)
    }

    /// Copy moved by `delta` in world space
    pub fn moved(&self, delta: Vec4) -> Self {
        let mut next = *self;
        next.position.x += delta.x;
        next.position.y += delta.y;
        next.position.z += delta.z;
        next
    }

    /// Copy with the yaw changed by `radians`
    pub fn turned(&self, radians: f32) -> Self {
        Self {
            yaw: self.yaw + radians,
            ..*self
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 0.0, 0.0),
            yaw: 0.0,
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
