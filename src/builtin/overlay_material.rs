use crate::context::Context;
use bytemuck::{Pod, Zeroable};

/// A vertex of a screen-space overlay triangle.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// Normalized device coordinates.
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// The material drawing flat colored triangles on top of the scene.
///
/// Overlays are drawn without depth testing, in submission order.
pub struct OverlayMaterial {
    pipeline: wgpu::RenderPipeline,
}

impl Default for OverlayMaterial {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayMaterial {
    pub fn new() -> OverlayMaterial {
        let ctxt = Context::get();

        let pipeline_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay_material_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let shader =
            ctxt.create_shader_module(Some("overlay_material_shader"), include_str!("overlay.wgsl"));

        let vertex_buffer_layouts = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }];

        let pipeline = ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("overlay_material_pipeline"),
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
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        OverlayMaterial { pipeline }
    }

    /// Draws `num_vertices` vertices of `vertices` as triangles.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        vertices: &wgpu::Buffer,
        num_vertices: u32,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.draw(0..num_vertices, 0..1);
    }
}
