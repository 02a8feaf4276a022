use glam::{Mat3, Vec3};

use crate::utils::{BoxMesh, Color, Vertex, BOX_VERTEX_COUNT};

/// The six faces of a box, in the order their triangles are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Left,
    Bottom,
    Right,
    Back,
    Top,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Left,
        Face::Bottom,
        Face::Right,
        Face::Back,
        Face::Top,
    ];

    pub fn normal(self) -> Vec3 {
        match self {
            Face::Front => Vec3::NEG_Z,
            Face::Back => Vec3::Z,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
            Face::Bottom => Vec3::NEG_Y,
            Face::Top => Vec3::Y,
        }
    }

    /// Faces are colored by the axis they are perpendicular to
    pub fn color(self) -> Color {
        match self {
            Face::Front | Face::Back => Color::BLUE,
            Face::Left | Face::Right => Color::GREEN,
            Face::Bottom | Face::Top => Color::RED,
        }
    }

    /// Corners of the two triangles on the unit box, wound so that
    /// `(b - a).cross(c - a)` points along the face normal
    fn corners(self) -> [[f32; 3]; 6] {
        match self {
            Face::Front => [
                [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0],
            ],
            Face::Left => [
                [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0],
            ],
            Face::Bottom => [
                [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0],
            ],
            Face::Right => [
                [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 1.0],
                [1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0],
            ],
            Face::Back => [
                [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0],
                [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
            ],
            Face::Top => [
                [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0],
            ],
        }
    }
}

/// Build the triangle list of a `width` x `height` x `depth` box whose
/// front-bottom-left corner sits at `location`.
///
/// With `rotated_phase` set every position is turned a quarter turn about the
/// vertical axis through `location`. Normals keep their per-face assignment.
///
/// Panics on non-positive or non-finite dimensions.
pub fn build_box(width: f32, height: f32, depth: f32, location: Vec3, rotated_phase: bool) -> BoxMesh {
    let size = Vec3::new(width, height, depth);
    assert!(
        size.is_finite() && size.min_element() > 0.0,
        "box dimensions must be positive, got {size}"
    );

    let rotation = rotated_phase.then(|| Mat3::from_rotation_y(std::f32::consts::FRAC_PI_2));

    let mut vertices = [Vertex::new(Vec3::ZERO, Vec3::ZERO, Color::BLUE); BOX_VERTEX_COUNT];
    let mut i = 0;
    for face in Face::ALL {
        for corner in face.corners() {
            let mut offset = Vec3::from_array(corner) * size;
            if let Some(rotation) = rotation {
                offset = rotation * offset;
            }
            vertices[i] = Vertex::new(location + offset, face.normal(), face.color());
            i += 1;
        }
    }

    BoxMesh::from_vertices(vertices)
}
