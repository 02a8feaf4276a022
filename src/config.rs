use glam::Vec3;

use crate::utils::Color;
use crate::view::LightSettings;

/// All tunables of one game session
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub pursuit: PursuitRules,
    pub projection: ProjectionSettings,
    pub lighting: LightSettings,
    pub background: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            pursuit: PursuitRules::default(),
            projection: ProjectionSettings::default(),
            lighting: LightSettings::default(),
            background: Color::BISQUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Follow the Object".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub start_position: Vec3,
    pub start_target: Vec3,
    /// Fraction of the eye-to-target vector travelled per frame
    pub move_speed: f32,
    /// Yaw step per frame, radians
    pub yaw_speed: f32,
    /// Rotation of the frame in which strafe movement is computed, radians
    pub strafe_angle: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 0.0, -10.0),
            start_target: Vec3::ZERO,
            move_speed: 0.02,
            yaw_speed: 0.01,
            strafe_angle: std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Speeds, distances and thresholds driving the pursuit object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitRules {
    pub start_position: Vec3,
    pub size: Vec3,
    pub initial_speed: f32,
    pub fast_speed: f32,
    pub slow_speed: f32,
    /// Closer than this and the object speeds up
    pub fast_radius: f32,
    /// Further than this and the object slows down
    pub slow_radius: f32,
    /// Further than this and the game is lost
    pub lose_distance: f32,
    /// z coordinate at which the object turns onto the x axis
    pub turn_at_z: f32,
    /// x coordinate which wins the game once the object has turned
    pub win_at_x: f32,
}

impl Default for PursuitRules {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.2, -0.5, 0.2),
            size: Vec3::ONE,
            initial_speed: 0.2,
            fast_speed: 0.5,
            slow_speed: 0.1,
            fast_radius: 5.0,
            slow_radius: 15.0,
            lose_distance: 60.0,
            turn_at_z: 95.0,
            win_at_x: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect: 1.0,
            z_near: 0.0001,
            z_far: 50.0,
        }
    }
}
