//! GPU copies of a [`Model`] and the per-frame skinning feeding them.

use std::sync::Arc;

use glamx::{Mat4, Vec2, Vec3};

use crate::animation::skinning;
use crate::builtin::{ModelMaterial, PrimitiveBuffers};
use crate::camera::Camera3d;
use crate::light::LightRig;
use crate::renderer::ToneMapping;
use crate::resource::{BufferType, GpuVec, Texture};
use crate::scene::{AlphaMode, Material, Model, NodeIndex};

/// One drawable primitive of a mesh node.
struct GpuPrimitive {
    node: NodeIndex,
    mesh: usize,
    primitive: usize,
    positions: GpuVec<Vec3>,
    uvs: GpuVec<Vec2>,
    normals: GpuVec<Vec3>,
    indices: GpuVec<[u32; 3]>,
    /// Index into the renderer's texture bind groups.
    texture: usize,
    object_offset: u32,
}

/// Draws the model of a scene.
///
/// The geometry is uploaded once per model; positions and normals are
/// re-skinned on the CPU and re-uploaded every frame.
pub struct ModelRenderer {
    material: ModelMaterial,
    primitives: Vec<GpuPrimitive>,
    /// Bind group of every model image, followed by the white fallback.
    texture_bind_groups: Vec<wgpu::BindGroup>,
    white: Arc<Texture>,
    uploaded_revision: Option<u64>,
}

impl Default for ModelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRenderer {
    pub fn new() -> ModelRenderer {
        ModelRenderer {
            material: ModelMaterial::new(),
            primitives: Vec::new(),
            texture_bind_groups: Vec::new(),
            white: Texture::new_white(),
            uploaded_revision: None,
        }
    }

    /// Whether the GPU copies were built for the scene revision `revision`.
    pub fn is_uploaded(&self, revision: u64) -> bool {
        self.uploaded_revision == Some(revision)
    }

    /// Builds the GPU copies of `model`, replacing the previous ones.
    pub fn upload(&mut self, model: &Model, revision: u64) {
        let textures: Vec<Arc<Texture>> = model.images.iter().map(Texture::from_image).collect();
        self.texture_bind_groups = textures
            .iter()
            .chain(std::iter::once(&self.white))
            .map(|t| self.material.create_texture_bind_group(t))
            .collect();
        let white_index = textures.len();

        self.primitives.clear();
        for (node, mesh) in model.mesh_nodes() {
            let Some(gltf_mesh) = model.meshes.get(mesh) else {
                log::warn!("Node {node} references missing mesh {mesh}.");
                continue;
            };

            for (primitive, p) in gltf_mesh.primitives.iter().enumerate() {
                if p.triangle_count() == 0 {
                    continue;
                }

                let texture = p
                    .material
                    .and_then(|m| model.materials.get(m))
                    .and_then(|m| m.base_color_texture)
                    .filter(|&image| image < textures.len())
                    .unwrap_or(white_index);

                self.primitives.push(GpuPrimitive {
                    node,
                    mesh,
                    primitive,
                    positions: GpuVec::new(p.positions.clone(), BufferType::Array, "model_positions"),
                    uvs: GpuVec::new(p.uvs.clone(), BufferType::Array, "model_uvs"),
                    normals: GpuVec::new(p.normals.clone(), BufferType::Array, "model_normals"),
                    indices: GpuVec::new(p.indices.clone(), BufferType::ElementArray, "model_indices"),
                    texture,
                    object_offset: 0,
                });
            }
        }

        // Blended surfaces are drawn last so that they blend over opaque ones.
        self.primitives.sort_by_key(|gpu| {
            material_of(model, gpu).alpha_mode == AlphaMode::Blend
        });

        log::debug!(
            "Uploaded {} primitives and {} textures.",
            self.primitives.len(),
            textures.len()
        );
        self.uploaded_revision = Some(revision);
    }

    /// Skins the model in its current pose and uploads everything the frame needs.
    pub fn prepare(
        &mut self,
        model: &Model,
        camera: &dyn Camera3d,
        lights: &LightRig,
        tone_mapping: ToneMapping,
        exposure: f32,
    ) {
        self.material
            .begin_frame(camera, lights, tone_mapping, exposure);

        let world = model.world_matrices();
        let joint_sets: Vec<Vec<Mat4>> = model
            .skins
            .iter()
            .map(|skin| skinning::joint_matrices(&world, skin))
            .collect();

        for gpu in &mut self.primitives {
            let Some(primitive) = model
                .meshes
                .get(gpu.mesh)
                .and_then(|m| m.primitives.get(gpu.primitive))
            else {
                continue;
            };

            let joints = model
                .nodes
                .get(gpu.node)
                .and_then(|n| n.skin)
                .and_then(|s| joint_sets.get(s))
                .map_or(&[][..], Vec::as_slice);
            let fallback = world.get(gpu.node).copied().unwrap_or(Mat4::IDENTITY);

            skinning::skin_primitive(
                primitive,
                joints,
                fallback,
                gpu.positions.data_mut(),
                gpu.normals.data_mut(),
            );

            gpu.positions.load_to_gpu();
            gpu.normals.load_to_gpu();
            gpu.uvs.load_to_gpu();
            gpu.indices.load_to_gpu();

            gpu.object_offset = self.material.push_object(material_of(model, gpu));
        }

        self.material.flush();
    }

    /// Draws the primitives prepared by [`ModelRenderer::prepare`].
    pub fn render(&self, model: &Model, render_pass: &mut wgpu::RenderPass<'_>) {
        for gpu in &self.primitives {
            let (Some(positions), Some(uvs), Some(normals), Some(indices)) = (
                gpu.positions.buffer(),
                gpu.uvs.buffer(),
                gpu.normals.buffer(),
                gpu.indices.buffer(),
            ) else {
                continue;
            };
            let Some(texture_bind_group) = self.texture_bind_groups.get(gpu.texture) else {
                continue;
            };

            let buffers = PrimitiveBuffers {
                positions,
                uvs,
                normals,
                indices,
                num_indices: (gpu.indices.len() * 3) as u32,
            };

            self.material.render(
                render_pass,
                material_of(model, gpu),
                gpu.object_offset,
                texture_bind_group,
                &buffers,
            );
        }
    }
}

static DEFAULT_MATERIAL: Material = Material::DEFAULT;

fn material_of<'a>(model: &'a Model, gpu: &GpuPrimitive) -> &'a Material {
    model
        .meshes
        .get(gpu.mesh)
        .and_then(|m| m.primitives.get(gpu.primitive))
        .and_then(|p| p.material)
        .and_then(|m| model.materials.get(m))
        .unwrap_or(&DEFAULT_MATERIAL)
}
