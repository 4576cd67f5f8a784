//! The wgpu render pipeline and the GPU-backed [`RenderSink`].
//!
//! Per-draw shader state (model transform, color, material, texture flags)
//! lives in a dynamically-offset uniform buffer: every draw gets its own
//! 256-byte slot written just before the draw call is recorded. Camera and
//! lighting are frame-global uniforms; each registered texture slot gets its
//! own bind group selected per draw.

use std::mem;

use cgmath::{SquareMatrix, Vector3};
use log::warn;
use wgpu::util::DeviceExt;

use crate::{
    camera::CameraUniform,
    data_structures::{
        material::Material,
        model::{DrawModel, Model, ModelVertex, Vertex},
        scene_graph::ShapeKind,
        transform,
    },
    lighting::{Lighting, LightingUniform},
    render::RenderSink,
    resources::{
        shapes::ShapeMeshes,
        texture::{Texture, TextureRegistry},
    },
};

/// Upper bound on draws per frame; the tableau uses a handful.
pub const MAX_DRAWS_PER_FRAME: u32 = 256;

/// Slot stride in the draw uniform buffer; matches the conservative
/// `min_uniform_buffer_offset_alignment` limit.
const DRAW_UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    diffuse_color: [f32; 3],
    shininess: f32,
    specular_color: [f32; 3],
    use_texture: u32,
    uv_scale: [f32; 2],
    _pad: [f32; 2],
}

impl DrawUniform {
    fn new() -> Self {
        Self {
            model: cgmath::Matrix4::identity().into(),
            color: [1.0, 1.0, 1.0, 1.0],
            diffuse_color: [0.8, 0.8, 0.8],
            shininess: 1.0,
            specular_color: [0.0, 0.0, 0.0],
            use_texture: 0,
            uv_scale: [1.0, 1.0],
            _pad: [0.0, 0.0],
        }
    }
}

/// Pipeline plus the buffers and bind groups the sink draws with.
pub struct TableauPipeline {
    pipeline: wgpu::RenderPipeline,
    draw_uniform_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_bind_groups: Vec<wgpu::BindGroup>,
    fallback_texture_group: wgpu::BindGroup,
}

impl TableauPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        textures: &TextureRegistry,
    ) -> Self {
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw uniform bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            mem::size_of::<CameraUniform>() as u64
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            mem::size_of::<LightingUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let draw_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: MAX_DRAWS_PER_FRAME as u64 * DRAW_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw uniform bind_group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: cgmath::Matrix4::identity().into(),
                view_position: [0.0, 0.0, 0.0, 1.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::bytes_of(&Lighting::default().to_raw()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals bind_group"),
            layout: &globals_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        });

        let texture_group = |texture: &Texture, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    },
                ],
            })
        };
        let texture_bind_groups = textures
            .iter()
            .map(|(_, tag, texture)| texture_group(texture, tag))
            .collect();
        // Bound whenever a draw has no texture; the shader ignores it then,
        // but the bind group slot still has to be filled.
        let fallback_texture_group = texture_group(&white_texture(device, queue), "untextured");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tableau Pipeline Layout"),
            bind_group_layouts: &[&draw_layout, &globals_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tableau Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some("Tableau Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ModelVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState {
                        alpha: wgpu::BlendComponent::REPLACE,
                        color: wgpu::BlendComponent::REPLACE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            pipeline,
            draw_uniform_buffer,
            draw_bind_group,
            camera_buffer,
            lighting_buffer,
            globals_bind_group,
            texture_bind_groups,
            fallback_texture_group,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }
}

fn white_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        1,
        1,
        image::Rgba([255, 255, 255, 255]),
    ));
    Texture::from_image(device, queue, &img, Some("white"))
        .expect("Failed to upload the 1x1 fallback texture.")
}

/// The GPU-backed render sink: accumulates shader state and records one
/// uniform slot plus an indexed draw per dispatched mesh.
pub struct WgpuSink<'a, 'encoder> {
    pipeline: &'a TableauPipeline,
    queue: &'a wgpu::Queue,
    pass: &'a mut wgpu::RenderPass<'encoder>,
    shapes: &'a ShapeMeshes,
    current: DrawUniform,
    texture_slot: Option<u32>,
    draw_index: u32,
}

impl<'a, 'encoder> WgpuSink<'a, 'encoder> {
    pub fn new(
        pipeline: &'a TableauPipeline,
        queue: &'a wgpu::Queue,
        pass: &'a mut wgpu::RenderPass<'encoder>,
        shapes: &'a ShapeMeshes,
    ) -> Self {
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(1, &pipeline.globals_bind_group, &[]);
        Self {
            pipeline,
            queue,
            pass,
            shapes,
            current: DrawUniform::new(),
            texture_slot: None,
            draw_index: 0,
        }
    }

    /// Write the accumulated state into the next uniform slot and select the
    /// texture bind group. Returns false when the frame's draw budget is
    /// spent.
    fn bind_draw_state(&mut self) -> bool {
        if self.draw_index >= MAX_DRAWS_PER_FRAME {
            warn!("frame draw budget ({MAX_DRAWS_PER_FRAME}) exceeded; skipping draw");
            return false;
        }
        let offset = self.draw_index as u64 * DRAW_UNIFORM_STRIDE;
        self.queue.write_buffer(
            &self.pipeline.draw_uniform_buffer,
            offset,
            bytemuck::bytes_of(&self.current),
        );
        self.pass
            .set_bind_group(0, &self.pipeline.draw_bind_group, &[offset as u32]);

        let texture_group = self
            .texture_slot
            .and_then(|slot| self.pipeline.texture_bind_groups.get(slot as usize))
            .unwrap_or(&self.pipeline.fallback_texture_group);
        self.pass.set_bind_group(2, texture_group, &[]);

        self.draw_index += 1;
        true
    }
}

impl RenderSink for WgpuSink<'_, '_> {
    fn set_transformations(
        &mut self,
        scale: Vector3<f32>,
        rotation_deg: Vector3<f32>,
        position: Vector3<f32>,
    ) {
        self.current.model = transform::model_matrix(scale, rotation_deg, position).into();
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.current.color = rgba;
        self.current.use_texture = 0;
        self.texture_slot = None;
    }

    fn set_texture_slot(&mut self, slot: Option<u32>) {
        self.texture_slot = slot;
        self.current.use_texture = u32::from(slot.is_some());
    }

    fn set_uv_scale(&mut self, u: f32, v: f32) {
        self.current.uv_scale = [u, v];
    }

    fn set_material(&mut self, material: &Material) {
        self.current.diffuse_color = material.diffuse_color.into();
        self.current.specular_color = material.specular_color.into();
        self.current.shininess = material.shininess;
    }

    fn set_lighting(&mut self, lighting: &Lighting) {
        self.queue.write_buffer(
            &self.pipeline.lighting_buffer,
            0,
            bytemuck::bytes_of(&lighting.to_raw()),
        );
    }

    fn draw_shape(&mut self, shape: ShapeKind) {
        if self.bind_draw_state() {
            self.pass.draw_mesh(self.shapes.get(shape));
        }
    }

    fn draw_model(&mut self, model: &Model) {
        if self.bind_draw_state() {
            self.pass.draw_model(model);
        }
    }
}
