use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::utils::{BoxMesh, Color};

/// Faults a renderer can report back to the frame loop
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererFault {
    #[error("renderer used in an invalid state: {0}")]
    InvalidState(String),
    #[error("rendering device or surface was lost")]
    DeviceLost,
    #[error("timed out waiting for the next frame")]
    Timeout,
    #[error("renderer ran out of memory")]
    OutOfMemory,
}

impl RendererFault {
    /// Transient faults are retried on the next frame after a reset
    pub fn is_transient(&self) -> bool {
        !matches!(self, RendererFault::OutOfMemory)
    }
}

/// One directional light plus a global ambient term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSettings {
    pub direction: Vec3,
    pub diffuse: Color,
    pub ambient: Color,
    pub enabled: bool,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-1.0, -1.0, 3.0),
            diffuse: Color::WHITE,
            ambient: Color::DARK_GRAY,
            enabled: true,
        }
    }
}

/// Immediate-mode drawing surface the frame loop issues its calls into.
///
/// Calls arrive in this order each frame: `clear`, `begin_scene`, the two
/// transforms, `configure_light`, any number of `submit_mesh`, `end_scene`,
/// `present`. After any call fails the frame loop stops issuing calls for that
/// frame and calls `reset` before the next one.
pub trait Renderer {
    fn clear(&mut self, color: Color) -> Result<(), RendererFault>;
    fn begin_scene(&mut self) -> Result<(), RendererFault>;
    fn set_view_transform(&mut self, view: Mat4) -> Result<(), RendererFault>;
    fn set_projection_transform(&mut self, projection: Mat4) -> Result<(), RendererFault>;
    fn configure_light(&mut self, light: &LightSettings) -> Result<(), RendererFault>;
    /// Draw the first `triangle_count` triangles of `mesh`. Asking for more
    /// triangles than the mesh holds is a bug and panics.
    fn submit_mesh(&mut self, mesh: &BoxMesh, triangle_count: u32) -> Result<(), RendererFault>;
    fn end_scene(&mut self) -> Result<(), RendererFault>;
    fn present(&mut self) -> Result<(), RendererFault>;

    /// Re-initialize device resources after a fault or a host-side reset
    fn reset(&mut self) -> Result<(), RendererFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_out_of_memory_is_fatal() {
        assert!(RendererFault::DeviceLost.is_transient());
        assert!(RendererFault::Timeout.is_transient());
        assert!(RendererFault::InvalidState("resized".into()).is_transient());
        assert!(!RendererFault::OutOfMemory.is_transient());
    }
}
