use glam::{Mat4, Vec3};

use super::input::InputSnapshot;
use crate::config::CameraSettings;
use crate::model::Camera;

/// Handles camera movement and orientation.
///
/// Priority when several keys are held: forward beats back, left beats right,
/// yaw-left beats yaw-right. The three groups are independent of each other.
/// Nothing bounds where the camera can go.
pub struct CameraController {
    pub move_speed: f32,
    pub yaw_speed: f32,
    strafe_frame: Mat4,
}

impl CameraController {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            move_speed: settings.move_speed,
            yaw_speed: settings.yaw_speed,
            strafe_frame: Mat4::from_rotation_y(settings.strafe_angle),
        }
    }

    /// Apply one frame of held keys to the camera
    pub fn update(&self, camera: &mut Camera, input: &InputSnapshot) {
        if input.forward {
            let movement = self.move_speed * camera.look_vector();
            translate(camera, movement);
        } else if input.back {
            let movement = self.move_speed * camera.look_vector();
            translate(camera, -movement);
        }

        if input.left {
            translate(camera, -self.strafe_movement(camera));
        } else if input.right {
            translate(camera, self.strafe_movement(camera));
        }

        if input.yaw_left {
            self.yaw(camera, -self.yaw_speed);
        } else if input.yaw_right {
            self.yaw(camera, self.yaw_speed);
        }
    }

    /// Movement computed in the yawed frame: both points are rotated about the
    /// world's vertical axis before taking their difference
    fn strafe_movement(&self, camera: &Camera) -> Vec3 {
        let target = self.strafe_frame.transform_point3(camera.orientation_target);
        let eye = self.strafe_frame.transform_point3(camera.position);
        self.move_speed * (target - eye)
    }

    /// Swing the look-at point about the world's vertical axis
    fn yaw(&self, camera: &mut Camera, angle: f32) {
        camera.orientation_target = Mat4::from_rotation_y(angle).transform_point3(camera.orientation_target);
    }
}

fn translate(camera: &mut Camera, movement: Vec3) {
    camera.position += movement;
    camera.orientation_target += movement;
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn setup() -> (CameraController, Camera) {
        let settings = CameraSettings::default();
        (CameraController::new(&settings), Camera::from_settings(&settings))
    }

    fn held(f: impl FnOnce(&mut InputSnapshot)) -> InputSnapshot {
        let mut snap = InputSnapshot::IDLE;
        f(&mut snap);
        snap
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "{a} != {b}");
    }

    #[test]
    fn test_idle_does_nothing() {
        let (controller, mut cam) = setup();
        let before = cam;
        controller.update(&mut cam, &InputSnapshot::IDLE);
        assert_eq!(cam, before);
    }

    #[test]
    fn test_forward_and_back_keep_look_direction() {
        let (controller, mut cam) = setup();
        controller.update(&mut cam, &held(|s| s.forward = true));
        assert_close(cam.position, Vec3::new(0.0, 0.0, -9.8));
        assert_close(cam.orientation_target, Vec3::new(0.0, 0.0, 0.2));
        assert_close(cam.look_vector(), Vec3::new(0.0, 0.0, 10.0));

        controller.update(&mut cam, &held(|s| s.back = true));
        assert_close(cam.position, Vec3::new(0.0, 0.0, -10.0));
        assert_close(cam.orientation_target, Vec3::ZERO);
    }

    #[test]
    fn test_forward_wins_over_back() {
        let (controller, mut cam) = setup();
        controller.update(&mut cam, &held(|s| {
            s.forward = true;
            s.back = true;
        }));
        assert_close(cam.position, Vec3::new(0.0, 0.0, -9.8));
    }

    #[test]
    fn test_strafe_moves_sideways() {
        let (controller, mut cam) = setup();
        // looking down +Z, the quarter-turned look vector is +X
        controller.update(&mut cam, &held(|s| s.right = true));
        assert_close(cam.position, Vec3::new(0.2, 0.0, -10.0));
        assert_close(cam.orientation_target, Vec3::new(0.2, 0.0, 0.0));

        let (controller, mut cam) = setup();
        controller.update(&mut cam, &held(|s| {
            s.left = true;
            s.right = true;
        }));
        assert_close(cam.position, Vec3::new(-0.2, 0.0, -10.0));
    }

    #[test]
    fn test_translation_groups_combine() {
        let (controller, mut cam) = setup();
        controller.update(&mut cam, &held(|s| {
            s.forward = true;
            s.right = true;
        }));
        assert_close(cam.position, Vec3::new(0.2, 0.0, -9.8));
    }

    #[test]
    fn test_yaw_moves_only_the_target() {
        let (controller, mut cam) = setup();
        cam.orientation_target = Vec3::new(0.0, 0.0, 5.0);
        controller.update(&mut cam, &held(|s| s.yaw_right = true));
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, -10.0));
        let expected = Mat4::from_rotation_y(0.01).transform_point3(Vec3::new(0.0, 0.0, 5.0));
        assert_close(cam.orientation_target, expected);
        assert!(cam.orientation_target.x > 0.0);

        let mut other = Camera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 5.0));
        controller.update(&mut other, &held(|s| {
            s.yaw_left = true;
            s.yaw_right = true;
        }));
        assert!(other.orientation_target.x < 0.0);
    }

    #[test]
    fn test_no_bounds() {
        let (controller, mut cam) = setup();
        for _ in 0..10_000 {
            controller.update(&mut cam, &held(|s| s.back = true));
        }
        assert!(cam.position.z < -1000.0);
    }
}
