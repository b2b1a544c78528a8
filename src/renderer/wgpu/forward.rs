//! Forward Renderer
//!
//! One render pass per frame: clear color and depth, then one indexed draw per
//! [`DrawItem`](crate::renderer::DrawItem).
//!
//! Per-draw uniforms live in a single buffer of fixed-stride slots addressed
//! with dynamic offsets, so a frame costs one `write_buffer` regardless of
//! the number of models. GPU vertex/index buffers are created lazily per
//! geometry handle and dropped once the geometry leaves the store.

use std::borrow::Cow;

use glam::{Mat4, Vec4};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::assets::{Geometry, GeometryHandle, GeometryStore, Vertex};
use crate::errors::{Result, TrellisError};
use crate::renderer::settings::RenderSettings;
use crate::renderer::wgpu::context::WgpuContext;
use crate::renderer::{FrameSubmission, LightData, RenderBackend, SurfaceSize};

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    mvp: Mat4,
    model: Mat4,
    light_position: Vec4,
    light_color: Vec4,
}

impl DrawUniforms {
    fn new(mvp: Mat4, model: Mat4, light: Option<&LightData>) -> Self {
        let (light_position, light_color) = match light {
            Some(l) => (l.position.extend(1.0), l.color.extend(l.ambient)),
            None => (Vec4::ZERO, Vec4::ONE),
        };
        Self {
            mvp,
            model,
            light_position,
            light_color,
        }
    }
}

const UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuGeometry {
    fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count(),
        }
    }
}

/// wgpu implementation of [`RenderBackend`].
pub struct ForwardRenderer {
    ctx: WgpuContext,
    pipeline: wgpu::RenderPipeline,

    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_capacity: u32,
    uniform_stride: u32,

    geometries: FxHashMap<GeometryHandle, GpuGeometry>,
}

impl ForwardRenderer {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        settings: &RenderSettings,
        size: SurfaceSize,
    ) -> Result<Self> {
        let ctx = WgpuContext::new(target, settings, size).await?;
        Ok(Self::from_context(ctx))
    }

    /// Blocking variant of [`new`](Self::new).
    pub fn new_blocking(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        settings: &RenderSettings,
        size: SurfaceSize,
    ) -> Result<Self> {
        pollster::block_on(Self::new(target, settings, size))
    }

    #[must_use]
    pub fn from_context(ctx: WgpuContext) -> Self {
        let device = &ctx.device;

        let min_alignment = device.limits().min_uniform_buffer_offset_alignment.max(1);
        let uniform_stride = align_to(UNIFORM_SIZE as u32, min_alignment);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let uniform_capacity = 1;
        let uniform_buffer = Self::create_uniform_buffer(device, uniform_stride, uniform_capacity);
        let uniform_bind_group = Self::create_uniform_bind_group(device, &uniform_layout, &uniform_buffer);

        let pipeline = Self::create_pipeline(&ctx, &uniform_layout);

        log::info!(
            "Forward renderer ready ({:?}, {}x{})",
            ctx.color_format(),
            ctx.config.width,
            ctx.config.height
        );

        Self {
            ctx,
            pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_capacity,
            uniform_stride,
            geometries: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &WgpuContext {
        &self.ctx
    }

    fn create_pipeline(ctx: &WgpuContext, uniform_layout: &wgpu::BindGroupLayout) -> wgpu::RenderPipeline {
        let device = &ctx.device;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Basic Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/basic.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Forward Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Forward Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    fn create_uniform_buffer(device: &wgpu::Device, stride: u32, capacity: u32) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: u64::from(stride) * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_uniform_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Uniforms BindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        })
    }

    fn ensure_uniform_capacity(&mut self, required_count: u32) {
        if required_count <= self.uniform_capacity {
            return;
        }

        let mut capacity = self.uniform_capacity.max(1);
        while capacity < required_count {
            capacity = capacity.saturating_mul(2);
        }

        let device = &self.ctx.device;
        self.uniform_buffer = Self::create_uniform_buffer(device, self.uniform_stride, capacity);
        self.uniform_bind_group =
            Self::create_uniform_bind_group(device, &self.uniform_layout, &self.uniform_buffer);
        self.uniform_capacity = capacity;
        log::debug!("Draw uniform buffer grown to {capacity} slots");
    }

    /// Uploads geometries seen for the first time and drops buffers whose
    /// geometry left the store.
    fn sync_geometries(&mut self, frame: &FrameSubmission, store: &GeometryStore) -> Result<()> {
        self.geometries.retain(|handle, _| store.get(*handle).is_some());

        for draw in &frame.draws {
            if self.geometries.contains_key(&draw.geometry) {
                continue;
            }
            let geometry = store.get(draw.geometry).ok_or(TrellisError::GeometryNotFound)?;
            let gpu = GpuGeometry::upload(&self.ctx.device, geometry);
            self.geometries.insert(draw.geometry, gpu);
        }
        Ok(())
    }

    fn write_uniforms(&mut self, frame: &FrameSubmission) {
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * frame.draws.len()];

        for (slot, draw) in bytes.chunks_exact_mut(stride).zip(&frame.draws) {
            let uniforms = DrawUniforms::new(draw.mvp, draw.model_matrix, frame.light.as_ref());
            slot[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniforms));
        }

        self.ctx.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
    }
}

impl RenderBackend for ForwardRenderer {
    fn resize(&mut self, size: SurfaceSize) -> Result<()> {
        self.ctx.resize(size)
    }

    fn submit(&mut self, frame: &FrameSubmission, geometries: &GeometryStore) -> Result<()> {
        self.sync_geometries(frame, geometries)?;
        self.ensure_uniform_capacity(frame.draws.len() as u32);
        if !frame.draws.is_empty() {
            self.write_uniforms(frame);
        }

        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.ctx.reconfigure();
                return Ok(());
            }
            Err(e) => {
                log::error!("Render error: {e:?}");
                return Err(e.into());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Forward Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipeline);

            for (index, draw) in frame.draws.iter().enumerate() {
                let Some(gpu) = self.geometries.get(&draw.geometry) else {
                    continue;
                };
                let offset = index as u32 * self.uniform_stride;
                pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
