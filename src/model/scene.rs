use glam::Vec3;

use super::geometry::build_box;
use crate::utils::BoxMesh;

/// One straight run of evenly spaced obstacle boxes
struct Row {
    start: Vec3,
    step: Vec3,
    count: usize,
}

const SPACING: f32 = 10.0;

/// Corridor along +Z up to the turn, then along +X.
const ROWS: [Row; 4] = [
    // right side before the turn
    Row { start: Vec3::new(3.0, 0.0, 10.0), step: Vec3::new(0.0, 0.0, SPACING), count: 9 },
    // left side before the turn
    Row { start: Vec3::new(-3.0, 0.0, 10.0), step: Vec3::new(0.0, 0.0, SPACING), count: 10 },
    // right side after the turn
    Row { start: Vec3::new(3.0, 0.0, 100.0), step: Vec3::new(SPACING, 0.0, 0.0), count: 10 },
    // left side after the turn
    Row { start: Vec3::new(-3.0, 0.0, 90.0), step: Vec3::new(SPACING, 0.0, 0.0), count: 10 },
];

/// Lay out the static obstacle boxes. Always the same list, in the same order.
pub fn build_scene() -> Vec<BoxMesh> {
    ROWS.iter()
        .flat_map(|row| (0..row.count).map(move |i| row.start + row.step * i as f32))
        .map(|location| build_box(1.0, 1.0, 1.0, location, false))
        .collect()
}

/// Static corridor meshes. Immutable after construction; a device reset
/// replaces the whole set.
pub struct Scene {
    obstacles: Vec<BoxMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self { obstacles: build_scene() }
    }

    pub fn obstacles(&self) -> &[BoxMesh] {
        &self.obstacles
    }

    pub fn rebuild(&mut self) {
        self.obstacles = build_scene();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
