use glam::Vec3;
use tracing::{debug, info};

use super::geometry::build_box;
use crate::config::PursuitRules;
use crate::utils::BoxMesh;

/// Result of the chase. Won and Lost are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        self != GameOutcome::InProgress
    }

    /// Message shown to the player at the end of the game
    pub fn message(self) -> Option<&'static str> {
        match self {
            GameOutcome::InProgress => None,
            GameOutcome::Won => Some("Congratulations! You Win!"),
            GameOutcome::Lost => Some("You Lose! Thanks for Playing!"),
        }
    }
}

/// The cube being chased
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitObject {
    pub position: Vec3,
    pub speed: f32,
    size: Vec3,
    rotated_phase: bool,
    mesh: BoxMesh,
}

impl PursuitObject {
    pub fn new(position: Vec3, speed: f32, size: Vec3) -> Self {
        Self {
            position,
            speed,
            size,
            rotated_phase: false,
            mesh: build_box(size.x, size.y, size.z, position, false),
        }
    }

    /// Set once the object has taken the corridor's turn; never cleared
    pub fn rotated_phase(&self) -> bool {
        self.rotated_phase
    }

    pub fn mesh(&self) -> &BoxMesh {
        &self.mesh
    }

    fn latch_rotation(&mut self) {
        self.rotated_phase = true;
    }

    /// Replace the mesh from the current position and phase
    pub fn rebuild_mesh(&mut self) {
        self.mesh = build_box(self.size.x, self.size.y, self.size.z, self.position, self.rotated_phase);
    }
}

/// Drives the pursuit object one step per frame and decides the outcome
pub struct PursuitStateMachine {
    object: PursuitObject,
    outcome: GameOutcome,
    rules: PursuitRules,
}

impl PursuitStateMachine {
    pub fn new(rules: PursuitRules) -> Self {
        Self {
            object: PursuitObject::new(rules.start_position, rules.initial_speed, rules.size),
            outcome: GameOutcome::InProgress,
            rules,
        }
    }

    pub fn object(&self) -> &PursuitObject {
        &self.object
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Rebuild the object's mesh without stepping the simulation
    pub fn rebuild_mesh(&mut self) {
        self.object.rebuild_mesh();
    }

    /// Advance one frame against the current camera position.
    ///
    /// Distances inside `[fast_radius, slow_radius]` leave the speed as it
    /// was. The mesh is rebuilt on every call, including after the game ended.
    pub fn advance(&mut self, camera_position: Vec3) -> GameOutcome {
        if self.outcome == GameOutcome::InProgress {
            self.step(camera_position);
        }
        self.object.rebuild_mesh();
        self.outcome
    }

    fn step(&mut self, camera_position: Vec3) {
        let rules = &self.rules;
        let object = &mut self.object;

        let distance = object.position.distance(camera_position);
        if distance < rules.fast_radius {
            object.speed = rules.fast_speed;
        } else if distance > rules.lose_distance {
            info!(distance, "pursuit object escaped");
            self.outcome = GameOutcome::Lost;
            return;
        } else if distance > rules.slow_radius {
            object.speed = rules.slow_speed;
        }

        if !object.rotated_phase && object.position.z >= rules.turn_at_z {
            debug!(position = ?object.position, "pursuit object turning");
            object.latch_rotation();
        }

        if object.rotated_phase {
            object.position.x += object.speed;
        } else {
            object.position.z += object.speed;
        }

        if object.rotated_phase && object.position.x >= rules.win_at_x {
            info!(position = ?object.position, "pursuit object reached the end of the corridor");
            self.outcome = GameOutcome::Won;
        }
    }
}
