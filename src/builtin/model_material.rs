use crate::camera::Camera3d;
use crate::color;
use crate::context::Context;
use crate::light::{LightRig, MAX_DIRECTIONAL_LIGHTS};
use crate::renderer::ToneMapping;
use crate::resource::{DynamicUniformBuffer, Texture};
use crate::scene::{AlphaMode, Material};
use bytemuck::{Pod, Zeroable};
use glamx::Mat4;

/// GPU representation of a directional light.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuLight {
    direction: [f32; 3],
    intensity: f32,
    color: [f32; 3],
    _padding: f32,
}

/// Frame-level uniforms (camera, lights, tone mapping).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    lights: [GpuLight; MAX_DIRECTIONAL_LIGHTS],
    num_lights: u32,
    exposure: f32,
    tone_mapping: u32,
    _padding: f32,
}

impl FrameUniforms {
    pub(crate) fn new(
        view: Mat4,
        proj: Mat4,
        lights: &LightRig,
        tone_mapping: ToneMapping,
        exposure: f32,
    ) -> Self {
        let [r, g, b] = color::scaled_rgb(lights.ambient.color, lights.ambient.intensity);
        let mut gpu_lights = [GpuLight::default(); MAX_DIRECTIONAL_LIGHTS];

        for (gpu, light) in gpu_lights.iter_mut().zip(lights.directional()) {
            *gpu = GpuLight {
                direction: light.direction().to_array(),
                intensity: light.intensity,
                color: [light.color.r, light.color.g, light.color.b],
                _padding: 0.0,
            };
        }

        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            ambient: [r, g, b, 1.0],
            lights: gpu_lights,
            num_lights: lights.directional().len().min(MAX_DIRECTIONAL_LIGHTS) as u32,
            exposure,
            tone_mapping: tone_mapping.as_gpu(),
            _padding: 0.0,
        }
    }
}

/// Per-draw uniforms (material factors).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    base_color: [f32; 4],
    alpha_cutoff: f32,
    alpha_mode: u32,
    _padding: [f32; 2],
}

impl ObjectUniforms {
    pub(crate) fn new(material: &Material) -> Self {
        let (alpha_mode, alpha_cutoff) = match material.alpha_mode {
            AlphaMode::Opaque => (0, 0.0),
            AlphaMode::Mask(cutoff) => (1, cutoff),
            AlphaMode::Blend => (2, 0.0),
        };
        let c = material.base_color;

        Self {
            base_color: [c.r, c.g, c.b, c.a],
            alpha_cutoff,
            alpha_mode,
            _padding: [0.0; 2],
        }
    }
}

/// The buffers of one draw call.
pub struct PrimitiveBuffers<'a> {
    pub positions: &'a wgpu::Buffer,
    pub uvs: &'a wgpu::Buffer,
    pub normals: &'a wgpu::Buffer,
    pub indices: &'a wgpu::Buffer,
    pub num_indices: u32,
}

/// The material drawing model primitives.
///
/// A frame goes through three phases:
/// 1. [`ModelMaterial::begin_frame`] uploads the camera and lights;
/// 2. [`ModelMaterial::push_object`] queues the uniforms of each draw, then
///    [`ModelMaterial::flush`] uploads them all at once;
/// 3. [`ModelMaterial::render`] issues the draw calls inside a render pass.
pub struct ModelMaterial {
    frame_uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_bind_group_layout: wgpu::BindGroupLayout,
    object_uniform_buffer: DynamicUniformBuffer<ObjectUniforms>,
    object_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    pipeline_cull: wgpu::RenderPipeline,
    pipeline_no_cull: wgpu::RenderPipeline,
    pipeline_blend_cull: wgpu::RenderPipeline,
    pipeline_blend_no_cull: wgpu::RenderPipeline,
}

impl Default for ModelMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelMaterial {
    /// Creates a new `ModelMaterial`.
    pub fn new() -> ModelMaterial {
        let ctxt = Context::get();

        let frame_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model_material_frame_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let object_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model_material_object_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model_material_texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
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

        let frame_uniform_buffer = ctxt.create_buffer(
            Some("model_material_frame_uniform_buffer"),
            std::mem::size_of::<FrameUniforms>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let frame_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_material_frame_bind_group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform_buffer.as_entire_binding(),
            }],
        });

        let object_uniform_buffer = DynamicUniformBuffer::new("model_material_object_uniforms");
        let object_bind_group =
            Self::create_object_bind_group(&object_bind_group_layout, &object_uniform_buffer);

        let pipeline_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_material_pipeline_layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &object_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let shader =
            ctxt.create_shader_module(Some("model_material_shader"), include_str!("model.wgsl"));

        // Positions, uvs and normals live in separate buffers so that skinning
        // only re-uploads the first and the last.
        let vertex_buffer_layouts = [
            // Buffer 0: Vertex positions
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            // Buffer 1: Texture coordinates
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            // Buffer 2: Normals
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        ];

        let create_pipeline = |cull_mode: Option<wgpu::Face>, blend: bool, label: &str| {
            ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffer_layouts,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctxt.surface_format,
                        blend: if blend {
                            Some(wgpu::BlendState::ALPHA_BLENDING)
                        } else {
                            Some(wgpu::BlendState::REPLACE)
                        },
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Context::depth_format(),
                    // Transparent surfaces are tested against, but do not occlude.
                    depth_write_enabled: !blend,
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
                cache: None,
            })
        };

        let pipeline_cull = create_pipeline(
            Some(wgpu::Face::Back),
            false,
            "model_material_pipeline_cull",
        );
        let pipeline_no_cull = create_pipeline(None, false, "model_material_pipeline_no_cull");
        let pipeline_blend_cull = create_pipeline(
            Some(wgpu::Face::Back),
            true,
            "model_material_pipeline_blend_cull",
        );
        let pipeline_blend_no_cull =
            create_pipeline(None, true, "model_material_pipeline_blend_no_cull");

        ModelMaterial {
            frame_uniform_buffer,
            frame_bind_group,
            object_bind_group_layout,
            object_uniform_buffer,
            object_bind_group,
            texture_bind_group_layout,
            pipeline_cull,
            pipeline_no_cull,
            pipeline_blend_cull,
            pipeline_blend_no_cull,
        }
    }

    fn create_object_bind_group(
        layout: &wgpu::BindGroupLayout,
        uniforms: &DynamicUniformBuffer<ObjectUniforms>,
    ) -> wgpu::BindGroup {
        let ctxt = Context::get();
        ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_material_object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: uniforms.buffer(),
                    offset: 0,
                    size: Some(DynamicUniformBuffer::<ObjectUniforms>::binding_size()),
                }),
            }],
        })
    }

    /// Creates the bind group sampling `texture` as the base color.
    pub fn create_texture_bind_group(&self, texture: &Texture) -> wgpu::BindGroup {
        let ctxt = Context::get();
        ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_material_texture_bind_group"),
            layout: &self.texture_bind_group_layout,
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
    }

    /// Signals the start of a new frame.
    ///
    /// Uploads the frame uniforms and forgets the object uniforms of the
    /// previous frame.
    pub fn begin_frame(
        &mut self,
        camera: &dyn Camera3d,
        lights: &LightRig,
        tone_mapping: ToneMapping,
        exposure: f32,
    ) {
        let uniforms = FrameUniforms::new(
            camera.view(),
            camera.projection(),
            lights,
            tone_mapping,
            exposure,
        );
        Context::get().write_buffer(&self.frame_uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.object_uniform_buffer.clear();
    }

    /// Queues the uniforms of one draw and returns its dynamic offset.
    pub fn push_object(&mut self, material: &Material) -> u32 {
        self.object_uniform_buffer.push(&ObjectUniforms::new(material))
    }

    /// Uploads the queued object uniforms to the GPU.
    pub fn flush(&mut self) {
        if self.object_uniform_buffer.flush() {
            self.object_bind_group = Self::create_object_bind_group(
                &self.object_bind_group_layout,
                &self.object_uniform_buffer,
            );
        }
    }

    /// Draws one primitive.
    ///
    /// `object_offset` is the value [`ModelMaterial::push_object`] returned for
    /// `material` during this frame.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        material: &Material,
        object_offset: u32,
        texture_bind_group: &wgpu::BindGroup,
        buffers: &PrimitiveBuffers<'_>,
    ) {
        let blend = material.alpha_mode == AlphaMode::Blend;
        let pipeline = match (blend, material.double_sided) {
            (false, false) => &self.pipeline_cull,
            (false, true) => &self.pipeline_no_cull,
            (true, false) => &self.pipeline_blend_cull,
            (true, true) => &self.pipeline_blend_no_cull,
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(1, &self.object_bind_group, &[object_offset]);
        render_pass.set_bind_group(2, texture_bind_group, &[]);

        render_pass.set_vertex_buffer(0, buffers.positions.slice(..));
        render_pass.set_vertex_buffer(1, buffers.uvs.slice(..));
        render_pass.set_vertex_buffer(2, buffers.normals.slice(..));
        render_pass.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint32);

        render_pass.draw_indexed(0..buffers.num_indices, 0, 0..1);
    }
}
