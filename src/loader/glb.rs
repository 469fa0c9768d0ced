//! Conversion of a decoded glTF document into a [`Model`].

use glamx::{Mat4, Quat, Vec2, Vec3};
use gltf::animation::util::ReadOutputs;
use image::{DynamicImage, ImageBuffer};

use crate::animation::{AnimationClip, Channel, Interpolation, Keyframes, Sampler};
use crate::color::Color;
use crate::error::{Result, ViewerError};
use crate::scene::{
    AlphaMode, ImageData, Material, Mesh, MeshPrimitive, Model, Node, Skin, Transform,
};

pub(crate) fn import_document(
    doc: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: Vec<gltf::image::Data>,
) -> Result<Model> {
    let nodes = import_nodes(doc);
    let roots = import_roots(doc, &nodes);

    let model = Model {
        nodes,
        roots,
        meshes: doc.meshes().map(|m| import_mesh(&m, buffers)).collect(),
        skins: doc.skins().map(|s| import_skin(&s, buffers)).collect(),
        materials: doc.materials().map(|m| import_material(&m)).collect(),
        images: images.into_iter().map(import_image).collect(),
        clips: doc
            .animations()
            .map(|a| import_animation(&a, buffers))
            .collect(),
        ..Default::default()
    };

    if !model.is_renderable() {
        return Err(ViewerError::EmptyAsset);
    }

    log::info!(
        "Imported {} nodes, {} meshes, {} skins, {} clips ({}).",
        model.nodes.len(),
        model.meshes.len(),
        model.skins.len(),
        model.clips.len(),
        model.clip_names().collect::<Vec<_>>().join(", ")
    );

    Ok(model)
}

fn import_nodes(doc: &gltf::Document) -> Vec<Node> {
    let mut nodes: Vec<Node> = doc
        .nodes()
        .map(|n| {
            let (translation, rotation, scale) = n.transform().decomposed();
            let rest = Transform::new(
                Vec3::from(translation),
                Quat::from_array(rotation).normalize(),
                Vec3::from(scale),
            );

            let mut node = Node::new(n.name().map(str::to_string), rest);
            node.children = n.children().map(|c| c.index()).collect();
            node.mesh = n.mesh().map(|m| m.index());
            node.skin = n.skin().map(|s| s.index());
            node
        })
        .collect();

    for parent in 0..nodes.len() {
        for child in nodes[parent].children.clone() {
            if let Some(node) = nodes.get_mut(child) {
                node.parent = Some(parent);
            }
        }
    }

    nodes
}

/// Roots of the default scene, or of the first scene, or every parentless node.
fn import_roots(doc: &gltf::Document, nodes: &[Node]) -> Vec<usize> {
    match doc.default_scene().or_else(|| doc.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
            .collect(),
    }
}

fn import_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Mesh {
    let mut primitives = Vec::new();

    for (index, prim) in mesh.primitives().enumerate() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping primitive {} of mesh {:?}: unsupported mode {:?}.",
                index,
                mesh.name().unwrap_or_default(),
                prim.mode()
            );
            continue;
        }

        let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let Some(positions) = reader.read_positions() else {
            log::warn!(
                "Skipping primitive {} of mesh {:?}: no positions.",
                index,
                mesh.name().unwrap_or_default()
            );
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from).collect();
        let normals = reader
            .read_normals()
            .map(|ns| ns.map(Vec3::from).collect());
        let uvs = reader
            .read_tex_coords(0)
            .map(|uvs| uvs.into_f32().map(Vec2::from).collect());
        let indices = reader.read_indices().map(|i| i.into_u32().collect());

        let joints = reader
            .read_joints(0)
            .map(|j| j.into_u16().collect())
            .unwrap_or_default();
        let weights = reader
            .read_weights(0)
            .map(|w| w.into_f32().collect())
            .unwrap_or_default();

        primitives.push(
            MeshPrimitive::new(positions, indices, normals, uvs)
                .with_skin_attributes(joints, weights)
                .with_material(prim.material().index()),
        );
    }

    Mesh {
        name: mesh.name().map(str::to_string),
        primitives,
    }
}

fn import_skin(skin: &gltf::Skin, buffers: &[gltf::buffer::Data]) -> Skin {
    let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
    let inverse_bind_matrices = reader
        .read_inverse_bind_matrices()
        .map(|ms| ms.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        .unwrap_or_default();

    Skin::new(
        skin.name().map(str::to_string),
        skin.joints().map(|j| j.index()).collect(),
        inverse_bind_matrices,
    )
}

fn import_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    Material {
        name: material.name().map(str::to_string),
        base_color: Color::new(r, g, b, a),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
        double_sided: material.double_sided(),
        alpha_mode: match material.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask(material.alpha_cutoff().unwrap_or(0.5)),
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        },
    }
}

/// Converts any decoded glTF image to RGBA8.
fn import_image(data: gltf::image::Data) -> ImageData {
    use gltf::image::Format;

    let (width, height) = (data.width, data.height);
    if width == 0 || height == 0 {
        log::warn!("Image of {width}x{height} pixels replaced by white.");
        return white_image();
    }

    let u16s = |bytes: &[u8]| -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    };
    let f32s = |bytes: &[u8]| -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    };

    let image = match data.format {
        Format::R8 => ImageBuffer::from_raw(width, height, data.pixels).map(DynamicImage::ImageLuma8),
        Format::R8G8 => {
            ImageBuffer::from_raw(width, height, data.pixels).map(DynamicImage::ImageLumaA8)
        }
        Format::R8G8B8 => ImageBuffer::from_raw(width, height, data.pixels).map(DynamicImage::ImageRgb8),
        Format::R8G8B8A8 => {
            ImageBuffer::from_raw(width, height, data.pixels).map(DynamicImage::ImageRgba8)
        }
        Format::R16 => {
            ImageBuffer::from_raw(width, height, u16s(&data.pixels)).map(DynamicImage::ImageLuma16)
        }
        Format::R16G16 => {
            ImageBuffer::from_raw(width, height, u16s(&data.pixels)).map(DynamicImage::ImageLumaA16)
        }
        Format::R16G16B16 => {
            ImageBuffer::from_raw(width, height, u16s(&data.pixels)).map(DynamicImage::ImageRgb16)
        }
        Format::R16G16B16A16 => {
            ImageBuffer::from_raw(width, height, u16s(&data.pixels)).map(DynamicImage::ImageRgba16)
        }
        Format::R32G32B32FLOAT => {
            ImageBuffer::from_raw(width, height, f32s(&data.pixels)).map(DynamicImage::ImageRgb32F)
        }
        Format::R32G32B32A32FLOAT => {
            ImageBuffer::from_raw(width, height, f32s(&data.pixels)).map(DynamicImage::ImageRgba32F)
        }
    };

    match image {
        Some(image) => ImageData::new(width, height, image.to_rgba8().into_raw()),
        None => {
            log::warn!("Image of {width}x{height} pixels has an inconsistent size, replaced by white.");
            white_image()
        }
    }
}

fn white_image() -> ImageData {
    ImageData::new(1, 1, vec![255; 4])
}

fn import_animation(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> AnimationClip {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("clip{}", animation.index()));

    let mut channels = Vec::new();
    for (index, channel) in animation.channels().enumerate() {
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
            log::warn!("Skipping channel {index} of clip {name:?}: missing data.");
            continue;
        };

        let keyframes = match outputs {
            ReadOutputs::Translations(v) => Keyframes::Translation(v.map(Vec3::from).collect()),
            ReadOutputs::Rotations(v) => {
                Keyframes::Rotation(v.into_f32().map(Quat::from_array).collect())
            }
            ReadOutputs::Scales(v) => Keyframes::Scale(v.map(Vec3::from).collect()),
            ReadOutputs::MorphTargetWeights(v) => Keyframes::Weights(v.into_f32().collect()),
        };
        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        match Sampler::new(inputs.collect(), keyframes, interpolation) {
            Some(sampler) => channels.push(Channel {
                target: channel.target().node().index(),
                sampler,
            }),
            None => log::warn!(
                "Skipping channel {index} of clip {name:?}: inconsistent keyframes."
            ),
        }
    }

    AnimationClip::new(name, channels)
}
