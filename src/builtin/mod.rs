//! Built-in materials and their shaders.

pub use self::model_material::{ModelMaterial, PrimitiveBuffers};
pub use self::overlay_material::{OverlayMaterial, OverlayVertex};

mod model_material;
mod overlay_material;
