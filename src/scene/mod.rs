//! The imported node hierarchy and the scene it is displayed in.

pub use self::material::{AlphaMode, ImageData, Material};
pub use self::mesh::{compute_normals, Joints, Mesh, MeshPrimitive, Weights};
pub use self::model::Model;
pub use self::node::{Node, NodeIndex};
pub use self::scene::Scene;
pub use self::skin::Skin;
pub use self::transform::Transform;

mod material;
mod mesh;
mod model;
mod node;
mod scene;
mod skin;
mod transform;
