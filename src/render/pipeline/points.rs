//! Point-sprite draw path (modern strategy)
//!
//! Each form's blob catalog is uploaded once into a per-form GPU buffer and
//! drawn as instance-stepped quads; bucket sizing, fading, and culling all
//! happen in the shader.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::form::{Blob, FormId, GalacticForm};
use crate::render::texture::GalaxyTextures;

/// Per-form GPU buffer slots; ids past this are logged and skipped
const MAX_FORM_BUFFERS: usize = 32;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    pub model: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub viewer_rot: [[f32; 4]; 4],
    pub size: f32,
    pub brightness: f32,
    pub min_feature_size: f32,
    pub _pad: f32,
}

impl PointUniforms {
    pub fn new(
        model: Mat4,
        view_proj: Mat4,
        viewer_rot: Mat4,
        size: f32,
        brightness: f32,
        min_feature_size: f32,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view_proj: view_proj.to_cols_array_2d(),
            viewer_rot: viewer_rot.to_cols_array_2d(),
            size,
            brightness,
            min_feature_size,
            _pad: 0.0,
        }
    }
}

/// Pipeline drawing whole blob catalogs as instanced point sprites
pub struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    form_buffers: Vec<Option<wgpu::Buffer>>,
}

impl PointPipeline {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        textures: &GalaxyTextures,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("galaxy_points_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/galaxy_points.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy_points_uniforms"),
            size: std::mem::size_of::<PointUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("galaxy_points_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("galaxy_points_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("galaxy_points_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, textures.bind_group_layout()],
            immediate_size: 0,
        });

        // the blob catalog itself is the instance buffer
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Blob>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Uint8x4,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("galaxy_points_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[instance_layout],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            form_buffers: (0..MAX_FORM_BUFFERS).map(|_| None).collect(),
        }
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload the form's catalog on first use; subsequent draws reuse it.
    /// Returns false when the form id exceeds the buffer table.
    pub fn ensure_form_buffer(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        form_id: FormId,
        form: &GalacticForm,
    ) -> bool {
        if form_id >= self.form_buffers.len() {
            log::warn!("form id {} exceeds the point buffer table, skipping", form_id);
            return false;
        }
        if self.form_buffers[form_id].is_none() {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("galaxy_points_blobs"),
                size: std::mem::size_of_val(form.blobs.as_slice()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&buffer, 0, bytemuck::cast_slice(&form.blobs));
            self.form_buffers[form_id] = Some(buffer);
        }
        true
    }

    /// One instanced draw over the visible prefix of the form's catalog
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        textures: &GalaxyTextures,
        form_id: FormId,
        visible_count: u32,
    ) {
        let Some(buffer) = self.form_buffers.get(form_id).and_then(|b| b.as_ref()) else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, textures.bind_group(), &[]);
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(0..4, 0..visible_count);
    }
}
