use crate::color::{Color, WHITE};

/// How the alpha channel of the base color is interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlphaMode {
    /// Alpha is ignored.
    Opaque,
    /// Fragments with an alpha below the cutoff are discarded.
    Mask(f32),
    /// Alpha blending is enabled.
    Blend,
}

/// The subset of a glTF metallic-roughness material the viewer draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: Color,
    /// Index into [`Model::images`](crate::scene::Model::images).
    pub base_color_texture: Option<usize>,
    pub double_sided: bool,
    pub alpha_mode: AlphaMode,
}

impl Material {
    /// The glTF default material: opaque, single-sided white.
    pub const DEFAULT: Material = Material {
        name: None,
        base_color: WHITE,
        base_color_texture: None,
        double_sided: false,
        alpha_mode: AlphaMode::Opaque,
    };
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A decoded image, always RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }
}
