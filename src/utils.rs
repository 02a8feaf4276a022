use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Number of vertices in every box mesh: 6 faces, 2 triangles each
pub const BOX_VERTEX_COUNT: usize = 36;
pub const BOX_TRIANGLE_COUNT: u32 = (BOX_VERTEX_COUNT / 3) as u32;

/// 32-bit RGBA color, one byte per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BISQUE: Color = Color::rgb(255, 228, 196);
    pub const DARK_GRAY: Color = Color::rgb(0x40, 0x40, 0x40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: Color,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.pos)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Triangle list for one box. The vertex count is fixed by the type, so a mesh
/// can only ever be replaced as a whole, never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    vertices: [Vertex; BOX_VERTEX_COUNT],
}

impl BoxMesh {
    pub fn from_vertices(vertices: [Vertex; BOX_VERTEX_COUNT]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> u32 {
        BOX_TRIANGLE_COUNT
    }

    /// Vertices of the first `triangle_count` triangles.
    ///
    /// Panics if the mesh holds fewer triangles than requested.
    pub fn leading_triangles(&self, triangle_count: u32) -> &[Vertex] {
        assert!(
            triangle_count <= BOX_TRIANGLE_COUNT,
            "{triangle_count} triangles requested from a {BOX_TRIANGLE_COUNT} triangle mesh"
        );
        &self.vertices[..triangle_count as usize * 3]
    }

    /// Iterate the mesh as `[v0, v1, v2]` triangles in submission order
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        // pos (12) + normal (12) + rgba (4)
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(std::mem::size_of::<Color>(), 4);
    }

    fn mesh() -> BoxMesh {
        let v = Vertex::new(Vec3::ZERO, Vec3::Y, Color::RED);
        BoxMesh::from_vertices([v; BOX_VERTEX_COUNT])
    }

    #[test]
    fn test_leading_triangles() {
        let mesh = mesh();
        assert_eq!(mesh.leading_triangles(0).len(), 0);
        assert_eq!(mesh.leading_triangles(5).len(), 15);
        assert_eq!(mesh.leading_triangles(BOX_TRIANGLE_COUNT).len(), BOX_VERTEX_COUNT);
    }

    #[test]
    #[should_panic(expected = "13 triangles requested")]
    fn test_leading_triangles_past_the_end_panics() {
        mesh().leading_triangles(BOX_TRIANGLE_COUNT + 1);
    }

    #[test]
    fn test_color_to_f32() {
        assert_eq!(Color::RED.to_f32_array(), [1.0, 0.0, 0.0, 1.0]);
        let gray = Color::DARK_GRAY.to_f32_array();
        assert!((gray[0] - 64.0 / 255.0).abs() < 1e-6);
        assert_eq!(gray[3], 1.0);
    }
}
