use glamx::Mat4;

use crate::scene::NodeIndex;

/// Joints driving a skinned mesh.
///
/// `inverse_bind_matrices[i]` brings a vertex from mesh space into the bind
/// space of `joints[i]`.
#[derive(Clone, Debug)]
pub struct Skin {
    pub name: Option<String>,
    pub joints: Vec<NodeIndex>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

impl Skin {
    /// Creates a skin. Missing inverse bind matrices default to identity.
    pub fn new(name: Option<String>, joints: Vec<NodeIndex>, mut inverse_bind_matrices: Vec<Mat4>) -> Self {
        inverse_bind_matrices.resize(joints.len(), Mat4::IDENTITY);
        Self {
            name,
            joints,
            inverse_bind_matrices,
        }
    }
}
