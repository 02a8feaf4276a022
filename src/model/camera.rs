use glam::{Mat4, Vec3};

use crate::config::{CameraSettings, ProjectionSettings};

/// Eye position plus the point it looks at. Both move together when the
/// camera translates; yawing only swings the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub orientation_target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, orientation_target: Vec3) -> Self {
        Self {
            position,
            orientation_target,
            up: Vec3::Y,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(settings.start_position, settings.start_target)
    }

    /// Unnormalized eye-to-target vector
    pub fn look_vector(&self) -> Vec3 {
        self.orientation_target - self.position
    }

    /// Left-handed look-at view matrix
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.orientation_target, self.up)
    }

    pub fn projection(settings: &ProjectionSettings) -> Mat4 {
        Mat4::perspective_lh(settings.fov_y, settings.aspect, settings.z_near, settings.z_far)
    }
}
