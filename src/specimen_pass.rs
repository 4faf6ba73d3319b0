//! The single-specimen render pass.
//!
//! One pipeline, one mesh per frame, two uniform groups: scene (camera +
//! rig lighting) and model (transform + tint/opacity). The pass owns its
//! depth buffer and clears the color target to transparent so the host
//! page shows through around the specimen.

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Transform, Vertex3d};
use crate::rig::{Color, PresentationRig};

/// Scene-wide uniforms: camera and rig lighting. Uploaded once per frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 3],
    time: f32,
    key_position: [f32; 3],
    key_intensity: f32,
    key_color: [f32; 4],
    rim_position: [f32; 3],
    rim_intensity: f32,
    rim_color: [f32; 4],
    /// x = ambient intensity, yzw unused padding.
    ambient: [f32; 4],
}

/// Per-specimen uniforms: transform and tint.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
}

/// Renders the specimen with the presentation rig's lighting.
pub struct SpecimenPass {
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    rig: PresentationRig,
}

impl SpecimenPass {
    pub fn new(gpu: &GpuContext, rig: PresentationRig) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Specimen Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/specimen.wgsl").into()),
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: std::mem::size_of::<ModelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Specimen Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Specimen Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    // The shader emits premultiplied alpha for the
                    // transparent surface.
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_view(gpu);

        Self {
            pipeline,
            scene_buffer,
            scene_bind_group,
            model_buffer,
            model_bind_group,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
            rig,
        }
    }

    /// The rig this pass was built with.
    pub fn rig(&self) -> &PresentationRig {
        &self.rig
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Specimen Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Clear the target to transparent without drawing anything.
    ///
    /// Used while the surface is mounted but the specimen subtree has
    /// nothing to show (still mounting, or the mesh is not ready).
    pub fn clear(&self, gpu: &GpuContext, view: &wgpu::TextureView) {
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Specimen Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Specimen Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Render one frame of the specimen.
    ///
    /// `tint` carries the wrapper opacity in its alpha channel.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        view: &wgpu::TextureView,
        time: f32,
        mesh: &Mesh,
        transform: Transform,
        tint: Color,
    ) {
        self.ensure_depth_size(gpu);

        let camera = &self.rig.camera;
        let view_proj = camera.projection_matrix(gpu.aspect()) * camera.view_matrix();

        let scene_uniforms = SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            time,
            key_position: self.rig.key.position.to_array(),
            key_intensity: self.rig.key.intensity,
            key_color: [
                self.rig.key.color.r,
                self.rig.key.color.g,
                self.rig.key.color.b,
                self.rig.key.color.a,
            ],
            rim_position: self.rig.rim.position.to_array(),
            rim_intensity: self.rig.rim.intensity,
            rim_color: [
                self.rig.rim.color.r,
                self.rig.rim.color.g,
                self.rig.rim.color.b,
                self.rig.rim.color.a,
            ],
            ambient: [self.rig.ambient.intensity, 0.0, 0.0, 0.0],
        };
        gpu.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[scene_uniforms]),
        );

        let model_matrix = transform.matrix();
        let model_uniforms = ModelUniforms {
            model: model_matrix.to_cols_array_2d(),
            normal_matrix: model_matrix.inverse().transpose().to_cols_array_2d(),
            color: [tint.r, tint.g, tint.b, tint.a],
        };
        gpu.queue.write_buffer(
            &self.model_buffer,
            0,
            bytemuck::cast_slice(&[model_uniforms]),
        );

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Specimen Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Specimen Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
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

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            pass.set_bind_group(1, &self.model_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}
