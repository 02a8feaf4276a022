// VIEW: Rendering and graphics
pub mod renderer;
#[cfg(feature = "native")]
pub mod render;
#[cfg(feature = "native")]
pub mod gpu_init;

pub use renderer::{Renderer, RendererFault, LightSettings};
#[cfg(feature = "native")]
pub use render::GpuRenderer;
#[cfg(feature = "native")]
pub use gpu_init::GpuContext;
