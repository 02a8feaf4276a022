use std::ops::Range;

use glam::Mat4;
use tracing::debug;
use wgpu::util::DeviceExt;

use super::gpu_init::GpuContext;
use super::renderer::{LightSettings, Renderer, RendererFault};
use crate::utils::{BoxMesh, Color, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_dir: [f32; 4],
    pub diffuse: [f32; 4],
    pub ambient: [f32; 4],
}

impl FrameUniform {
    fn new(view: Mat4, projection: Mat4, light: &LightSettings) -> Self {
        let enabled = if light.enabled { 1.0 } else { 0.0 };
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            light_dir: light.direction.extend(enabled).to_array(),
            diffuse: light.diffuse.to_f32_array(),
            ambient: light.ambient.to_f32_array(),
        }
    }
}

pub struct FrameResources {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

pub fn create_frame_resources(device: &wgpu::Device) -> FrameResources {
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("frame_uniform_buffer"),
        size: std::mem::size_of::<FrameUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("frame_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frame_bind_group"),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }],
    });

    FrameResources { uniform_buffer, bind_group_layout, bind_group }
}

pub fn create_box_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("box_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/box.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("box_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("box_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                    wgpu::VertexAttribute { offset: 24, shader_location: 2, format: wgpu::VertexFormat::Unorm8x4 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // boxes are seen from both sides when the camera drives through them
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

fn surface_fault(err: wgpu::SurfaceError) -> RendererFault {
    match err {
        wgpu::SurfaceError::Timeout => RendererFault::Timeout,
        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost => RendererFault::DeviceLost,
        wgpu::SurfaceError::OutOfMemory => RendererFault::OutOfMemory,
        other => RendererFault::InvalidState(other.to_string()),
    }
}

/// Everything recorded between `begin_scene` and `end_scene`
struct Staging {
    clear: Color,
    view: Mat4,
    projection: Mat4,
    light: LightSettings,
    vertices: Vec<Vertex>,
    draws: Vec<Range<u32>>,
    in_scene: bool,
}

impl Staging {
    fn new() -> Self {
        Self {
            clear: Color::BISQUE,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light: LightSettings::default(),
            vertices: Vec::new(),
            draws: Vec::new(),
            in_scene: false,
        }
    }

    fn require_scene(&self, call: &str) -> Result<(), RendererFault> {
        if self.in_scene {
            Ok(())
        } else {
            Err(RendererFault::InvalidState(format!("{call} outside begin_scene/end_scene")))
        }
    }
}

/// wgpu-backed renderer. Draw calls are batched into one render pass that is
/// encoded and submitted in `end_scene`; `present` flips the surface.
pub struct GpuRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    frame: FrameResources,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    staging: Staging,
    pending: Option<wgpu::SurfaceTexture>,
}

impl GpuRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let frame = create_frame_resources(&gpu.device);
        let pipeline = create_box_pipeline(&gpu.device, gpu.format, &frame.bind_group_layout);
        let (depth_texture, depth_view) = create_depth_texture(&gpu.device, gpu.config.width, gpu.config.height);
        Self {
            gpu,
            pipeline,
            frame,
            _depth_texture: depth_texture,
            depth_view,
            staging: Staging::new(),
            pending: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    /// Adopt a new window size. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        debug!(width, height, "resizing surface");
        self.rebuild_surface(width, height);
    }

    fn rebuild_surface(&mut self, width: u32, height: u32) {
        self.pending = None;
        self.gpu.reconfigure(width, height);
        let (depth_texture, depth_view) = create_depth_texture(&self.gpu.device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    fn encode_scene(&self, target: &wgpu::TextureView) -> wgpu::CommandBuffer {
        let device = &self.gpu.device;
        let staging = &self.staging;

        let uniform = FrameUniform::new(staging.view, staging.projection, &staging.light);
        self.gpu.queue.write_buffer(&self.frame.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        let vertex_buffer = (!staging.vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scene_vertex_buffer"),
                contents: bytemuck::cast_slice(&staging.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let [r, g, b, a] = staging.clear.to_f32_array();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(vertex_buffer) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.frame.bind_group, &[]);
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                for draw in &staging.draws {
                    pass.draw(draw.clone(), 0..1);
                }
            }
        }
        encoder.finish()
    }
}

impl Renderer for GpuRenderer {
    fn clear(&mut self, color: Color) -> Result<(), RendererFault> {
        self.staging.clear = color;
        Ok(())
    }

    fn begin_scene(&mut self) -> Result<(), RendererFault> {
        if self.staging.in_scene {
            return Err(RendererFault::InvalidState("begin_scene called twice".to_string()));
        }
        self.staging.in_scene = true;
        self.staging.vertices.clear();
        self.staging.draws.clear();
        Ok(())
    }

    fn set_view_transform(&mut self, view: Mat4) -> Result<(), RendererFault> {
        self.staging.view = view;
        Ok(())
    }

    fn set_projection_transform(&mut self, projection: Mat4) -> Result<(), RendererFault> {
        self.staging.projection = projection;
        Ok(())
    }

    fn configure_light(&mut self, light: &LightSettings) -> Result<(), RendererFault> {
        self.staging.light = *light;
        Ok(())
    }

    fn submit_mesh(&mut self, mesh: &BoxMesh, triangle_count: u32) -> Result<(), RendererFault> {
        self.staging.require_scene("submit_mesh")?;
        let vertices = mesh.leading_triangles(triangle_count);
        let first = self.staging.vertices.len() as u32;
        self.staging.vertices.extend_from_slice(vertices);
        self.staging.draws.push(first..first + vertices.len() as u32);
        Ok(())
    }

    fn end_scene(&mut self) -> Result<(), RendererFault> {
        self.staging.require_scene("end_scene")?;
        self.staging.in_scene = false;

        let output = self.gpu.surface.get_current_texture().map_err(surface_fault)?;
        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let commands = self.encode_scene(&target);
        self.gpu.queue.submit(std::iter::once(commands));
        self.pending = Some(output);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RendererFault> {
        let output = self
            .pending
            .take()
            .ok_or_else(|| RendererFault::InvalidState("present without a finished scene".to_string()))?;
        output.present();
        Ok(())
    }

    fn reset(&mut self) -> Result<(), RendererFault> {
        let (width, height) = self.size();
        debug!(width, height, "resetting renderer");
        self.staging = Staging::new();
        self.rebuild_surface(width, height);
        Ok(())
    }
}
